//! Custom serializers for standard-library time types.
//!
//! Both shapes are opaque: the generic pipeline must never introspect them,
//! so they declare no fields, methods or constructors and are only usable
//! through the serializers below.

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::error::WireError;
use crate::registry::custom::CustomSerializer;
use crate::schema::{SchemaField, SchemaFragment};
use crate::shape::ClassShape;
use crate::value::{ObjRef, Reflected};
use crate::wire::{SerializationContext, WireReader, WireWriter};

/// Type names the default whitelist always admits.
pub const BUILTIN_TYPE_NAMES: &[&str] = &["std::time::SystemTime", "std::time::Duration"];

pub static SYSTEM_TIME_SHAPE: ClassShape = ClassShape::opaque("std::time::SystemTime");
pub static DURATION_SHAPE: ClassShape = ClassShape::opaque("std::time::Duration");

/// Shapes the loading scope registers up front.
pub fn builtin_shapes() -> Vec<&'static ClassShape> {
    vec![&SYSTEM_TIME_SHAPE, &DURATION_SHAPE]
}

pub(crate) fn builtin_serializers() -> Vec<Arc<dyn CustomSerializer>> {
    vec![Arc::new(SystemTimeSerializer), Arc::new(DurationSerializer)]
}

impl Reflected for SystemTime {
    fn shape(&self) -> &'static ClassShape {
        &SYSTEM_TIME_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

impl Reflected for Duration {
    fn shape(&self) -> &'static ClassShape {
        &DURATION_SHAPE
    }
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

// -----------------------------------------------------------------------------
// SystemTime

/// Encodes a `SystemTime` as signed milliseconds relative to the Unix epoch.
pub struct SystemTimeSerializer;

impl CustomSerializer for SystemTimeSerializer {
    fn target(&self) -> &'static ClassShape {
        &SYSTEM_TIME_SHAPE
    }

    fn write(
        &self,
        obj: &dyn Reflected,
        writer: &mut WireWriter,
        _ctx: &SerializationContext,
    ) -> Result<(), WireError> {
        let time = obj
            .downcast_ref::<SystemTime>()
            .ok_or(WireError::UnexpectedValue {
                expected: "std::time::SystemTime",
                found: "object",
            })?;
        let millis = match time.duration_since(UNIX_EPOCH) {
            Ok(after) => after.as_millis() as i64,
            Err(before) => -(before.duration().as_millis() as i64),
        };
        writer.write_i64(millis);
        Ok(())
    }

    fn read(
        &self,
        reader: &mut WireReader<'_>,
        _ctx: &SerializationContext,
    ) -> Result<ObjRef, WireError> {
        let millis = reader.read_i64()?;
        let time = if millis >= 0 {
            UNIX_EPOCH + Duration::from_millis(millis as u64)
        } else {
            UNIX_EPOCH - Duration::from_millis(millis.unsigned_abs())
        };
        Ok(Arc::new(time))
    }

    fn describe(&self) -> SchemaFragment {
        SchemaFragment {
            name: SYSTEM_TIME_SHAPE.name().to_owned(),
            label: SYSTEM_TIME_SHAPE.label().to_owned(),
            provides: Vec::new(),
            source: "custom",
            fields: vec![SchemaField {
                name: "epoch_millis".to_owned(),
                ty: "i64".to_owned(),
                mandatory: true,
            }],
        }
    }
}

// -----------------------------------------------------------------------------
// Duration

/// Encodes a `Duration` as whole seconds plus the subsecond nanoseconds.
pub struct DurationSerializer;

impl CustomSerializer for DurationSerializer {
    fn target(&self) -> &'static ClassShape {
        &DURATION_SHAPE
    }

    fn write(
        &self,
        obj: &dyn Reflected,
        writer: &mut WireWriter,
        _ctx: &SerializationContext,
    ) -> Result<(), WireError> {
        let duration = obj
            .downcast_ref::<Duration>()
            .ok_or(WireError::UnexpectedValue {
                expected: "std::time::Duration",
                found: "object",
            })?;
        writer.write_i64(duration.as_secs() as i64);
        writer.write_i32(duration.subsec_nanos() as i32);
        Ok(())
    }

    fn read(
        &self,
        reader: &mut WireReader<'_>,
        _ctx: &SerializationContext,
    ) -> Result<ObjRef, WireError> {
        let secs = reader.read_i64()? as u64;
        let nanos = reader.read_i32()? as u32;
        Ok(Arc::new(Duration::new(secs, nanos)))
    }

    fn describe(&self) -> SchemaFragment {
        SchemaFragment {
            name: DURATION_SHAPE.name().to_owned(),
            label: DURATION_SHAPE.label().to_owned(),
            provides: Vec::new(),
            source: "custom",
            fields: vec![
                SchemaField {
                    name: "secs".to_owned(),
                    ty: "i64".to_owned(),
                    mandatory: true,
                },
                SchemaField {
                    name: "subsec_nanos".to_owned(),
                    ty: "i32".to_owned(),
                    mandatory: true,
                },
            ],
        }
    }
}
