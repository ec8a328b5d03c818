use std::sync::Arc;

use crate::error::WireError;
use crate::registry::{Compiled, SerializerFactory};
use crate::value::{ObjRef, Value};
use crate::wire::refs::{ReadReferences, ReferenceOutcome, ReferenceTable};
use crate::wire::{tag, SerializationContext, WireReader, WireWriter, MAGIC};

// -----------------------------------------------------------------------------
// WriteDriver

/// Walks an object graph, consulting the factory per encountered type and
/// compacting repeated objects into back-references.
pub struct WriteDriver<'a> {
    factory: &'a SerializerFactory,
    ctx: &'a SerializationContext,
    refs: ReferenceTable,
}

impl<'a> WriteDriver<'a> {
    pub fn new(factory: &'a SerializerFactory, ctx: &'a SerializationContext) -> Self {
        Self {
            factory,
            ctx,
            refs: ReferenceTable::new(),
        }
    }

    /// Encodes one complete graph into a standalone blob.
    pub fn write_graph(mut self, obj: &ObjRef) -> Result<Vec<u8>, WireError> {
        let mut writer = WireWriter::new();
        writer.write_raw(&MAGIC);
        writer.write_u8(self.ctx.wire_version());
        self.write_object(obj, &mut writer)?;
        Ok(writer.into_inner())
    }

    fn write_value(&mut self, value: &Value, writer: &mut WireWriter) -> Result<(), WireError> {
        match value {
            Value::Null => writer.write_u8(tag::NULL),
            Value::Bool(true) => writer.write_u8(tag::TRUE),
            Value::Bool(false) => writer.write_u8(tag::FALSE),
            Value::I32(v) => {
                writer.write_u8(tag::I32);
                writer.write_i32(*v);
            }
            Value::I64(v) => {
                writer.write_u8(tag::I64);
                writer.write_i64(*v);
            }
            Value::F64(v) => {
                writer.write_u8(tag::F64);
                writer.write_f64(*v);
            }
            Value::Str(v) => {
                writer.write_u8(tag::STR);
                writer.write_str(v);
            }
            Value::Bytes(v) => {
                writer.write_u8(tag::BYTES);
                writer.write_bytes(v);
            }
            Value::List(items) => {
                writer.write_u8(tag::LIST);
                writer.write_u32(items.len() as u32);
                for item in items {
                    self.write_value(item, writer)?;
                }
            }
            Value::Object(obj) => self.write_object(obj, writer)?,
        }
        Ok(())
    }

    fn write_object(&mut self, obj: &ObjRef, writer: &mut WireWriter) -> Result<(), WireError> {
        if self.ctx.object_references() {
            // Index assignment is pre-order: the slot exists before the body,
            // so descendants can point back at an ancestor.
            if let ReferenceOutcome::AlreadySeen(index) = self.refs.track(obj) {
                writer.write_u8(tag::REF);
                writer.write_u32(index);
                return Ok(());
            }
        }

        let shape = obj.shape();
        let compiled = self.factory.get(shape, self.ctx)?;
        writer.write_u8(tag::OBJECT);
        writer.write_str(shape.name());

        match &*compiled {
            Compiled::Custom(custom) => custom.write(obj.as_ref(), writer, self.ctx),
            Compiled::Object(plan) => {
                writer.write_u32(plan.len() as u32);
                for info in plan.properties() {
                    let value = info.read(obj.as_ref());
                    self.write_value(&value, writer)
                        .map_err(|e| e.at(info.name()))?;
                }
                Ok(())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// ReadDriver

/// Decodes a blob back into a graph, mirroring the writer's pre-order index
/// assignment so back-references land on the right instances.
pub struct ReadDriver<'a> {
    factory: &'a SerializerFactory,
    ctx: &'a SerializationContext,
    refs: ReadReferences,
}

impl<'a> ReadDriver<'a> {
    pub fn new(factory: &'a SerializerFactory, ctx: &'a SerializationContext) -> Self {
        Self {
            factory,
            ctx,
            refs: ReadReferences::new(),
        }
    }

    pub fn read_graph(mut self, bytes: &[u8]) -> Result<ObjRef, WireError> {
        let mut reader = WireReader::new(bytes);
        if reader.take(4)? != MAGIC {
            return Err(WireError::BadMagic);
        }
        let version = reader.read_u8()?;
        if version == 0 || version > self.ctx.wire_version() {
            return Err(WireError::UnsupportedVersion(version));
        }
        self.read_value(&mut reader)?.expect_object()
    }

    fn read_value(&mut self, reader: &mut WireReader<'_>) -> Result<Value, WireError> {
        match reader.read_u8()? {
            tag::NULL => Ok(Value::Null),
            tag::FALSE => Ok(Value::Bool(false)),
            tag::TRUE => Ok(Value::Bool(true)),
            tag::I32 => Ok(Value::I32(reader.read_i32()?)),
            tag::I64 => Ok(Value::I64(reader.read_i64()?)),
            tag::F64 => Ok(Value::F64(reader.read_f64()?)),
            tag::STR => Ok(Value::Str(reader.read_str()?)),
            tag::BYTES => Ok(Value::Bytes(reader.read_bytes()?)),
            tag::LIST => {
                let count = reader.read_u32()? as usize;
                let mut items = Vec::with_capacity(count.min(4096));
                for _ in 0..count {
                    items.push(self.read_value(reader)?);
                }
                Ok(Value::List(items))
            }
            tag::OBJECT => Ok(Value::Object(self.read_object(reader)?)),
            tag::REF => {
                let index = reader.read_u32()?;
                Ok(Value::Object(self.refs.resolve(index)?))
            }
            other => Err(WireError::InvalidTag(other)),
        }
    }

    fn read_object(&mut self, reader: &mut WireReader<'_>) -> Result<ObjRef, WireError> {
        let name = reader.read_str()?;
        let shape = self
            .ctx
            .scope()
            .resolve(&name)
            .ok_or_else(|| WireError::UnknownType(name.clone()))?;

        // The whitelist check inside `get` runs before anything is
        // instantiated, so an unauthorized type in the blob has no way to
        // trigger constructor side effects.
        let compiled = self.factory.get(shape, self.ctx)?;

        let index = self.refs.reserve();
        let obj = match &*compiled {
            Compiled::Custom(custom) => custom.read(reader, self.ctx)?,
            Compiled::Object(plan) => {
                let count = reader.read_u32()? as usize;
                if count != plan.len() {
                    return Err(WireError::PropertyCount {
                        type_name: shape.name().into(),
                        expected: plan.len(),
                        found: count,
                    });
                }
                let mut values = Vec::with_capacity(count);
                for info in plan.properties() {
                    values.push(self.read_value(reader).map_err(|e| e.at(info.name()))?);
                }
                plan.reconstruct(values)?
            }
        };
        self.refs.fill(index, Arc::clone(&obj));
        Ok(obj)
    }
}
