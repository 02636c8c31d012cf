//! # Kivi Bridge
//!
//! Dynamically-typed accessor surface over the [`kivi_store`] engine.
//!
//! The bridge sits between a loosely-typed host (values are booleans,
//! numbers, strings, or binary buffers) and the strongly typed store. It
//! provides:
//!
//! - Instance lifecycle: configuration validation, open/create, idempotent
//!   teardown ([`StoreInstance`])
//! - Value dispatch: one untyped `set`/`get` routed to the correct typed
//!   store operation ([`DynValue`])
//! - A reference-counted, zero-copy binary view whose lifetime is
//!   independent of the instance that produced it ([`SharedBuffer`])
//! - The twelve-operation accessor surface with per-operation arity and
//!   argument contracts ([`Accessor`], [`Op`])
//! - A process-wide registry of named instances ([`Registry`])
//!
//! ## Example
//!
//! ```no_run
//! use kivi_bridge::{Accessor, DynValue, InstanceConfig, Op};
//!
//! let accessor = Accessor::new(InstanceConfig::new("settings"))?;
//! accessor.call(Op::Set, &["volume".into(), 0.8.into()])?;
//! assert_eq!(
//!     accessor.call(Op::GetNumber, &["volume".into()])?,
//!     DynValue::Number(0.8),
//! );
//! # Ok::<(), kivi_bridge::BridgeError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod buffer;
mod error;
mod instance;
mod registry;
mod surface;
mod value;

pub use buffer::SharedBuffer;
pub use error::{BridgeError, BridgeResult};
pub use instance::{InstanceConfig, StoreInstance};
pub use registry::Registry;
pub use surface::{Accessor, Op};
pub use value::DynValue;
