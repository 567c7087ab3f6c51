//! Embedded task-dispatching runtime.
//!
//! A controller device sends framed command packets over one or more
//! transports; this runtime decodes them, instantiates tasks by UID, drives
//! each through its lifecycle one cooperative tick at a time, and routes
//! every final result back to its initiator. Single-threaded, non-blocking,
//! no preemption.
//!
//! # Crate structure
//!
//! - [`wire`] — packet header, framed packet codec, FCS policies
//! - [`transport`] — transport capability trait, validated ports, the hub
//! - [`runtime`] — task trait, lifecycle scheduler, registry, channels
//! - [`bridge`] — the glue: inbound packets to scheduler calls, results to
//!   reply packets
//!
//! # A minimal composition root
//!
//! ```no_run
//! use taskdock::bridge::ExternalBridge;
//! use taskdock::runtime::{TaskManager, TaskRegistry};
//! use taskdock::transport::Hub;
//! use taskdock::wire::{DeviceConfig, FcsPolicy, WireSpec};
//!
//! let spec = WireSpec::new(32, 1, FcsPolicy::Crc32).unwrap();
//! let device = DeviceConfig { board_id: 0x10, device_count: 2 };
//!
//! let registry = TaskRegistry::<u8>::new();
//! // registry.register(UID, constructor)...
//! let mut manager = TaskManager::new(registry);
//!
//! let hub = Hub::new(vec![/* ports over your transports */]);
//! let bridge = ExternalBridge::new(hub, spec, device).into_handle();
//!
//! loop {
//!     ExternalBridge::update(&bridge, &mut manager);
//!     manager.update();
//! }
//! ```

pub mod bridge;

/// Re-export wire protocol types.
pub mod wire {
    pub use taskdock_wire::*;
}

/// Re-export transport types.
pub mod transport {
    pub use taskdock_transport::*;
}

/// Re-export runtime types.
pub mod runtime {
    pub use taskdock_runtime::*;
}

pub use bridge::ExternalBridge;
