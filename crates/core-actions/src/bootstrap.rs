//! Build a ready-to-use coordinator from configuration.

use crate::coordinator::Coordinator;
use crate::editor::EditorContext;
use core_config::{ConfigFile, MappingConfig};
use core_events::parse_key_sequence;
use core_keymap::{COMMAND_MAP, INSERT_MAP, KeyMapProvider, NORMAL_MAP, Remapping, VISUAL_MAP};
use tracing::{error, info};

/// Key maps a `[[map]]` entry's `mode` field refers to.
fn maps_for_mode(mode: &str) -> Option<&'static [&'static str]> {
    let maps: &'static [&'static str] = match mode {
        "normal" | "n" => &[NORMAL_MAP],
        "visual" | "v" | "x" => &[VISUAL_MAP],
        "insert" | "i" => &[INSERT_MAP],
        "command" | "c" => &[COMMAND_MAP],
        "" => &[NORMAL_MAP, VISUAL_MAP],
        "!" => &[INSERT_MAP, COMMAND_MAP],
        _ => return None,
    };
    Some(maps)
}

/// Install configured mappings. Invalid entries are logged and skipped.
/// Returns how many entries were installed.
pub fn install_mappings(provider: &mut dyn KeyMapProvider, mappings: &[MappingConfig]) -> usize {
    let mut installed = 0;
    for (index, mapping) in mappings.iter().enumerate() {
        let Some(maps) = maps_for_mode(mapping.mode.trim()) else {
            error!(target: "config", index, mode = %mapping.mode, "unknown_mapping_mode");
            continue;
        };
        let parsed = parse_key_sequence(&mapping.lhs)
            .and_then(|lhs| parse_key_sequence(&mapping.rhs).map(|rhs| (lhs, rhs)));
        let (lhs, rhs) = match parsed {
            Ok(pair) => pair,
            Err(err) => {
                error!(target: "config", index, lhs = %mapping.lhs, rhs = %mapping.rhs, %err, "invalid_mapping");
                continue;
            }
        };
        for name in maps {
            provider
                .key_map_mut(name)
                .add_mapping(lhs.clone(), Remapping::new(rhs.clone(), mapping.recursive));
        }
        installed += 1;
    }
    info!(target: "config", installed, skipped = mappings.len() - installed, "mappings_installed");
    installed
}

/// Coordinator with the built-in modes, configured mappings and map depth.
pub fn build_coordinator(mut editor: EditorContext, config: &ConfigFile) -> Coordinator {
    install_mappings(editor.key_maps_mut(), &config.map);
    let mut coordinator = Coordinator::with_default_modes(editor);
    coordinator.set_max_map_depth(config.input.effective_maxmapdepth() as usize);
    coordinator
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::KeyStroke;
    use core_keymap::DefaultKeyMapProvider;

    fn mapping(mode: &str, lhs: &str, rhs: &str) -> MappingConfig {
        MappingConfig {
            mode: mode.into(),
            lhs: lhs.into(),
            rhs: rhs.into(),
            recursive: true,
        }
    }

    #[test]
    fn installs_valid_and_skips_invalid() {
        let mut provider = DefaultKeyMapProvider::new();
        let n = install_mappings(
            &mut provider,
            &[
                mapping("insert", "jj", "<Esc>"),
                mapping("bogus", "a", "b"),
                mapping("n", "<Nope>", "x"),
                mapping("", "Q", "dd"),
            ],
        );
        assert_eq!(n, 2);
        let esc = provider.key_map(INSERT_MAP).unwrap().get(&parse_key_sequence("jj").unwrap());
        assert!(esc.is_some());
        for name in [NORMAL_MAP, VISUAL_MAP] {
            let map = provider.key_map(name).unwrap();
            assert!(map.get(&[KeyStroke::char('Q')]).is_some());
        }
    }

    #[test]
    fn coordinator_takes_configured_depth() {
        let mut config = ConfigFile::default();
        config.input.maxmapdepth = 5000;
        let editor = crate::test_support::editor_at("", 0);
        let c = build_coordinator(editor, &config);
        assert_eq!(c.max_map_depth(), 1000);
    }
}
