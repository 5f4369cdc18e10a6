//! Target hardware description.

use serde::{Deserialize, Serialize};

use crate::connectivity::ConnectivityGraph;
use crate::error::{HalError, HalResult};

/// One compilation target: a device name plus its connectivity.
///
/// Supplied by the caller, either constructed in code from the topology
/// factories or deserialized from a declarative JSON description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HardwareConfiguration {
    /// Device name, used in diagnostics.
    pub name: String,
    /// Which physical qubits can interact directly.
    pub connectivity: ConnectivityGraph,
}

impl HardwareConfiguration {
    /// Describe a device in code.
    pub fn new(name: impl Into<String>, connectivity: ConnectivityGraph) -> Self {
        HardwareConfiguration {
            name: name.into(),
            connectivity,
        }
    }

    /// Load a device description from JSON, restoring the adjacency
    /// cache the serialized form omits.
    pub fn from_json(text: &str) -> HalResult<Self> {
        let mut config: HardwareConfiguration =
            serde_json::from_str(text).map_err(HalError::Description)?;
        let num_qubits = config.connectivity.num_qubits();
        for channel in config.connectivity.channels() {
            for endpoint in [channel.a, channel.b] {
                if endpoint.0 >= num_qubits {
                    return Err(HalError::QubitOutOfRange {
                        qubit: endpoint.0,
                        num_qubits,
                    });
                }
            }
        }
        config.connectivity.rebuild_caches();
        Ok(config)
    }

    /// Serialize the description to JSON.
    pub fn to_json(&self) -> HalResult<String> {
        serde_json::to_string_pretty(self).map_err(HalError::Description)
    }

    /// Number of physical qubits on this device.
    pub fn num_qubits(&self) -> u32 {
        self.connectivity.num_qubits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectivity::PhysicalQubit;

    #[test]
    fn test_json_roundtrip() {
        let config = HardwareConfiguration::new("line-3", ConnectivityGraph::linear(3));
        let json = config.to_json().unwrap();
        let back = HardwareConfiguration::from_json(&json).unwrap();

        assert_eq!(back.name, "line-3");
        assert_eq!(back.num_qubits(), 3);
        // The adjacency cache is restored as part of loading.
        assert!(back.connectivity.is_adjacent(PhysicalQubit(0), PhysicalQubit(1)));
        assert!(!back.connectivity.is_adjacent(PhysicalQubit(0), PhysicalQubit(2)));
    }

    #[test]
    fn test_declarative_description() {
        let json = r#"{
            "name": "triangle",
            "connectivity": {
                "num_qubits": 3,
                "channels": [
                    { "a": 0, "b": 1 },
                    { "a": 1, "b": 2 },
                    { "a": 2, "b": 0 }
                ]
            }
        }"#;
        let config = HardwareConfiguration::from_json(json).unwrap();
        assert!(config.connectivity.is_adjacent(PhysicalQubit(2), PhysicalQubit(0)));
    }

    #[test]
    fn test_malformed_description() {
        assert!(HardwareConfiguration::from_json("{ not json").is_err());
    }
}
