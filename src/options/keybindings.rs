use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::KeyCommand;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "KeybindingTable", into = "KeybindingTable")]
/// Configurable keyboard bindings mapping commands to key codes.
pub struct KeybindingOptions {
    /// Maps command → key string (e.g. `Transition` → `"Space"`).
    pub bindings: HashMap<KeyCommand, String>,
    /// Reverse lookup cache (key string → command). Rebuilt on load.
    key_to_command: HashMap<String, KeyCommand>,
}

/// On-disk form: the bindings only.
#[derive(Serialize, Deserialize)]
#[serde(default)]
struct KeybindingTable {
    bindings: HashMap<KeyCommand, String>,
}

impl Default for KeybindingTable {
    fn default() -> Self {
        Self {
            bindings: KeybindingOptions::default().bindings,
        }
    }
}

impl From<KeybindingTable> for KeybindingOptions {
    fn from(table: KeybindingTable) -> Self {
        let mut opts = Self {
            bindings: table.bindings,
            key_to_command: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl From<KeybindingOptions> for KeybindingTable {
    fn from(opts: KeybindingOptions) -> Self {
        Self {
            bindings: opts.bindings,
        }
    }
}

impl PartialEq for KeybindingOptions {
    fn eq(&self, other: &Self) -> bool {
        self.bindings == other.bindings
    }
}

impl Eq for KeybindingOptions {}

impl Default for KeybindingOptions {
    fn default() -> Self {
        let bindings = HashMap::from([
            (KeyCommand::Transition, "Space".into()),
            (KeyCommand::ForceReturn, "KeyF".into()),
            (KeyCommand::SecuritySafe, "KeyS".into()),
            (KeyCommand::SecurityDanger, "KeyD".into()),
            (KeyCommand::SecurityWarning, "KeyW".into()),
            (KeyCommand::SecurityScanning, "KeyC".into()),
            (KeyCommand::SecurityNormal, "KeyN".into()),
            (KeyCommand::CycleTheme, "KeyT".into()),
            (KeyCommand::CycleLighting, "KeyL".into()),
            (KeyCommand::CycleBloomPreset, "KeyB".into()),
            (KeyCommand::ToggleEyeRotation, "KeyR".into()),
            (KeyCommand::ResetMaterials, "KeyX".into()),
            (KeyCommand::LightingDim, "Digit1".into()),
            (KeyCommand::LightingBalanced, "Digit2".into()),
            (KeyCommand::LightingBright, "Digit3".into()),
            (KeyCommand::LightingPbr, "Digit4".into()),
            (KeyCommand::ToggleForceShowRings, "KeyV".into()),
        ]);

        let mut opts = Self {
            bindings,
            key_to_command: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → command).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_command.clear();
        for (command, key) in &self.bindings {
            let _ = self.key_to_command.insert(key.clone(), *command);
        }
    }

    /// Look up the command for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyCommand> {
        self.key_to_command.get(key).copied()
    }
}
