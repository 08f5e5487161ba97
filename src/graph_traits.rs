// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! This module contains the traits that need to be implemented by the types
//! that represent a node, a switching device and a series branch.

use crate::device_kind::{SeriesBranchKind, SwitchingDeviceKind, VoltagePhasor};
use num_complex::Complex64;

/**
This trait needs to be implemented by the type that represents a node of the
node/breaker model.

Read more about why this is necessary [here][crate#the-node-switchingdevice-and-seriesbranch-traits].

<details>
<summary>Example implementation:</summary>

```ignore
impl node_breaker_topology::Node for model::Node {
    fn node_id(&self) -> u64 {
        self.internal_id as u64
    }

    fn voltage_phasor(&self) -> Option<node_breaker_topology::VoltagePhasor> {
        let voltage = self.voltage.as_ref()?;
        Some(node_breaker_topology::VoltagePhasor {
            angle_in_degrees: voltage.measurement.angle_in_degrees,
            include_in_estimator: voltage.include_in_estimator,
        })
    }
}
```

</details>
*/
pub trait Node {
    /// Returns the id of the node.
    fn node_id(&self) -> u64;
    /// Returns the voltage phasor of the node, or `None` if the node has no
    /// phasor measurement configured.
    fn voltage_phasor(&self) -> Option<VoltagePhasor>;
}

/**
This trait needs to be implemented by the type that represents a circuit
breaker or a switch.

Only breakers report measured and inferred status, so those methods default
to `false`.

<details>
<summary>Example implementation:</summary>

```ignore
impl node_breaker_topology::SwitchingDevice for model::CircuitBreaker {
    fn from_node(&self) -> u64 {
        self.from_node_id
    }

    fn to_node(&self) -> u64 {
        self.to_node_id
    }

    fn kind(&self) -> node_breaker_topology::SwitchingDeviceKind {
        node_breaker_topology::SwitchingDeviceKind::Breaker
    }

    fn is_closed(&self) -> bool {
        self.status.is_closed()
    }

    fn is_measured_closed(&self) -> bool {
        self.status.measured == BreakerStatus::Closed
    }

    fn is_inferred_closed(&self) -> bool {
        self.status.inferred == BreakerStatus::Closed
    }
}
```

</details>
*/
pub trait SwitchingDevice {
    /// Returns the id of the node on one side of the device.
    fn from_node(&self) -> u64;
    /// Returns the id of the node on the other side of the device.
    fn to_node(&self) -> u64;
    /// Returns whether the device is a breaker or a switch.
    fn kind(&self) -> SwitchingDeviceKind;
    /// Returns true if the device is closed.
    fn is_closed(&self) -> bool;
    /// Returns true if breaker telemetry reports the device as closed.
    fn is_measured_closed(&self) -> bool {
        false
    }
    /// Returns true if the device is inferred to be closed from surrounding
    /// measurements.
    fn is_inferred_closed(&self) -> bool {
        false
    }
}

/// This trait needs to be implemented by the type that represents a line
/// segment or a series compensator of a transmission line.
pub trait SeriesBranch {
    /// Returns the id of the node on one side of the branch.
    fn from_node(&self) -> u64;
    /// Returns the id of the node on the other side of the branch.
    fn to_node(&self) -> u64;
    /// Returns the kind of the branch.
    fn kind(&self) -> SeriesBranchKind;
    /// Returns the series impedance of the branch.
    fn impedance(&self) -> Complex64;
}
