//! The dynamic accessor surface.
//!
//! Every host-visible capability of one store instance is reached through a
//! single uniform entry point: [`Accessor::call`] with an [`Op`] and a slice
//! of dynamic arguments. Validation is layered in a fixed order, arity
//! first, then argument shapes, then the store operation itself, so a
//! malformed call never touches the store.

use crate::error::{BridgeError, BridgeResult};
use crate::instance::{InstanceConfig, StoreInstance};
use crate::value::DynValue;
use std::sync::Arc;

/// One operation of the accessor surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    /// Store one value under a string key.
    Set,
    /// Typed boolean lookup.
    GetBoolean,
    /// Typed number lookup.
    GetNumber,
    /// Typed string lookup.
    GetString,
    /// Binary lookup producing a shared buffer view.
    GetBuffer,
    /// Existence check independent of type.
    Contains,
    /// Remove one key.
    Delete,
    /// Enumerate all keys.
    GetAllKeys,
    /// Remove all entries.
    DeleteAll,
    /// Atomically change the encryption key.
    Recrypt,
    /// Flush caches and compact the backing storage.
    Trim,
    /// Report the current physical size.
    Size,
}

impl Op {
    /// Every operation, in surface order.
    pub const ALL: [Op; 12] = [
        Op::Set,
        Op::GetBoolean,
        Op::GetNumber,
        Op::GetString,
        Op::GetBuffer,
        Op::Contains,
        Op::Delete,
        Op::GetAllKeys,
        Op::DeleteAll,
        Op::Recrypt,
        Op::Trim,
        Op::Size,
    ];

    /// The host-facing name of this operation.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Op::Set => "set",
            Op::GetBoolean => "getBoolean",
            Op::GetNumber => "getNumber",
            Op::GetString => "getString",
            Op::GetBuffer => "getBuffer",
            Op::Contains => "contains",
            Op::Delete => "delete",
            Op::GetAllKeys => "getAllKeys",
            Op::DeleteAll => "deleteAll",
            Op::Recrypt => "recrypt",
            Op::Trim => "trim",
            Op::Size => "size",
        }
    }

    /// The exact argument count this operation accepts.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Op::Set => 2,
            Op::GetBoolean
            | Op::GetNumber
            | Op::GetString
            | Op::GetBuffer
            | Op::Contains
            | Op::Delete
            | Op::Recrypt => 1,
            Op::GetAllKeys | Op::DeleteAll | Op::Trim | Op::Size => 0,
        }
    }

    /// Resolves a host-facing name back to its operation.
    #[must_use]
    pub fn parse(name: &str) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A host-facing handle exposing the full operation surface of one
/// instance.
///
/// Cloning shares the underlying instance. The instance is destroyed when
/// the last clone is dropped; an explicit [`close`](Accessor::close) tears
/// it down earlier, after which every call fails with
/// [`BridgeError::InstanceClosed`].
#[derive(Debug, Clone)]
pub struct Accessor {
    instance: Arc<StoreInstance>,
}

impl Accessor {
    /// Opens a new instance and wraps it in an accessor.
    ///
    /// # Errors
    ///
    /// Propagates the construction failures of
    /// [`StoreInstance::create`].
    pub fn new(config: InstanceConfig) -> BridgeResult<Self> {
        Ok(Self {
            instance: Arc::new(StoreInstance::create(config)?),
        })
    }

    /// Wraps an already-created instance.
    #[must_use]
    pub fn from_instance(instance: Arc<StoreInstance>) -> Self {
        Self { instance }
    }

    /// Returns the underlying instance.
    #[must_use]
    pub fn instance(&self) -> &Arc<StoreInstance> {
        &self.instance
    }

    /// Destroys the underlying instance. Idempotent.
    pub fn close(&self) {
        self.instance.destroy();
    }

    /// Dispatches one operation.
    ///
    /// Arity is checked first, then argument shapes, then the store is
    /// touched. Lookups whose key is absent (or holds a value of another
    /// type) return [`DynValue::Undefined`]; operations without a result
    /// also return `Undefined`.
    pub fn call(&self, op: Op, args: &[DynValue]) -> BridgeResult<DynValue> {
        if args.len() != op.arity() {
            return Err(BridgeError::ArityMismatch {
                op: op.name(),
                expected: op.arity(),
                actual: args.len(),
            });
        }
        match op {
            Op::Set => {
                let key = key_arg(op, &args[0])?;
                self.instance.set(key, &args[1])?;
                Ok(DynValue::Undefined)
            }
            Op::GetBoolean => {
                let key = key_arg(op, &args[0])?;
                Ok(option_result(self.instance.get_boolean(key)?.map(DynValue::Bool)))
            }
            Op::GetNumber => {
                let key = key_arg(op, &args[0])?;
                Ok(option_result(self.instance.get_number(key)?.map(DynValue::Number)))
            }
            Op::GetString => {
                let key = key_arg(op, &args[0])?;
                Ok(option_result(self.instance.get_string(key)?.map(DynValue::String)))
            }
            Op::GetBuffer => {
                let key = key_arg(op, &args[0])?;
                Ok(option_result(self.instance.get_buffer(key)?.map(DynValue::Buffer)))
            }
            Op::Contains => {
                let key = key_arg(op, &args[0])?;
                Ok(DynValue::Bool(self.instance.contains(key)?))
            }
            Op::Delete => {
                let key = key_arg(op, &args[0])?;
                self.instance.delete(key)?;
                Ok(DynValue::Undefined)
            }
            Op::GetAllKeys => {
                let keys = self.instance.get_all_keys()?;
                Ok(DynValue::Array(
                    keys.into_iter().map(DynValue::String).collect(),
                ))
            }
            Op::DeleteAll => {
                self.instance.delete_all()?;
                Ok(DynValue::Undefined)
            }
            Op::Recrypt => {
                let new_key = match &args[0] {
                    DynValue::Undefined => None,
                    DynValue::String(s) => Some(s.as_str()),
                    other => {
                        return Err(BridgeError::InvalidArgumentType {
                            op: op.name(),
                            argument: "encryptionKey",
                            expected: "string (or undefined)",
                            actual: other.shape_name(),
                        })
                    }
                };
                self.instance.recrypt(new_key)?;
                Ok(DynValue::Undefined)
            }
            Op::Trim => {
                self.instance.trim()?;
                Ok(DynValue::Undefined)
            }
            Op::Size => Ok(DynValue::Number(self.instance.size()? as f64)),
        }
    }
}

fn key_arg<'a>(op: Op, arg: &'a DynValue) -> BridgeResult<&'a str> {
    arg.as_str().ok_or(BridgeError::InvalidKeyType {
        op: op.name(),
        actual: arg.shape_name(),
    })
}

fn option_result(value: Option<DynValue>) -> DynValue {
    value.unwrap_or(DynValue::Undefined)
}
