//! Field plans: analyzed schemas compiled into flat per-record step lists.
//!
//! A program holds one plan per record type reachable from the root. Nested
//! fields refer to other plans by index, so cyclic schemas compile into a
//! finite program with back edges.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use bytestream::UnsignedWidth;
use schema::{RecordSchema, SchemaRegistry, WireKind};

use crate::error::{CodecError, CodecResult};

/// Index of the top-level record in [`CodecProgram::records`].
pub(crate) const ROOT: usize = 0;

/// One transcoding instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    I8,
    I16,
    I32,
    I64,
    F32,
    F64,
    Char16,
    UnsignedI32(UnsignedWidth),
    UnsignedI64(UnsignedWidth),
    Enum { variants: usize },
    Text,
    Bytes,
    /// Inline the record plan at this index.
    Record(usize),
}

impl Op {
    /// The op for a field that does not nest another record.
    const fn leaf(wire: WireKind) -> Option<Self> {
        let op = match wire {
            WireKind::I8 => Self::I8,
            WireKind::I16 => Self::I16,
            WireKind::I32 => Self::I32,
            WireKind::I64 => Self::I64,
            WireKind::F32 => Self::F32,
            WireKind::F64 => Self::F64,
            WireKind::Char16 => Self::Char16,
            WireKind::UnsignedI32(width) => Self::UnsignedI32(width),
            WireKind::UnsignedI64(width) => Self::UnsignedI64(width),
            WireKind::Enum { variants } => Self::Enum { variants },
            WireKind::Text => Self::Text,
            WireKind::Bytes => Self::Bytes,
            WireKind::Nested(_) => return None,
        };
        Some(op)
    }

    /// Name of the value kind this op consumes, for diagnostics.
    pub(crate) const fn value_name(self) -> &'static str {
        match self {
            Self::I8 => "int8",
            Self::I16 => "int16",
            Self::I32 | Self::UnsignedI32(_) => "int32",
            Self::I64 | Self::UnsignedI64(_) => "int64",
            Self::F32 => "float32",
            Self::F64 => "float64",
            Self::Char16 => "char16",
            Self::Enum { .. } => "enum",
            Self::Text => "text",
            Self::Bytes => "bytes",
            Self::Record(_) => "nested record",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Step {
    pub field: &'static str,
    pub op: Op,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordPlan {
    pub name: &'static str,
    pub fixed_size: Option<usize>,
    /// Whether a nesting cycle is reachable from this record.
    pub cyclic: bool,
    pub steps: Vec<Step>,
}

/// Plans for the root record and every record it nests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CodecProgram {
    pub records: Vec<RecordPlan>,
}

impl CodecProgram {
    /// Compiles `root` and every record reachable from it.
    pub(crate) fn compile(
        root: Arc<RecordSchema>,
        registry: &SchemaRegistry,
    ) -> CodecResult<Self> {
        let mut index = HashMap::<TypeId, usize>::new();
        index.insert(root.record().id(), ROOT);
        let mut pending = vec![root];
        let mut records = Vec::new();

        while records.len() < pending.len() {
            let schema = Arc::clone(&pending[records.len()]);
            let mut steps = Vec::with_capacity(schema.fields().len());
            for field in schema.fields() {
                let op = match field.wire {
                    WireKind::Nested(nested) => {
                        let next = index.get(&nested.id()).copied();
                        Op::Record(match next {
                            Some(existing) => existing,
                            None => {
                                let next = pending.len();
                                index.insert(nested.id(), next);
                                pending.push(registry.schema(nested)?);
                                next
                            }
                        })
                    }
                    wire => Op::leaf(wire).ok_or_else(|| {
                        generation_failure(schema.name(), format!("no op for field {}", field.name))
                    })?,
                };
                steps.push(Step {
                    field: field.name,
                    op,
                });
            }
            records.push(RecordPlan {
                name: schema.name(),
                fixed_size: schema.fixed_size(),
                cyclic: schema.is_cyclic(),
                steps,
            });
        }

        let program = Self { records };
        program.verify()?;
        Ok(program)
    }

    /// The top-level record plan.
    pub(crate) fn root(&self) -> &RecordPlan {
        &self.records[ROOT]
    }

    /// Checks every fixed-size plan sums to the size the analyzer reported.
    fn verify(&self) -> CodecResult<()> {
        for plan in &self.records {
            let Some(expected) = plan.fixed_size else {
                continue;
            };
            let actual = plan.steps.iter().try_fold(0usize, |total, step| {
                self.step_width(step.op).map(|width| total + width)
            });
            if actual != Some(expected) {
                let detail = match actual {
                    Some(actual) => {
                        format!("plan width {actual} differs from fixed size {expected}")
                    }
                    None => format!("plan has no static width but fixed size is {expected}"),
                };
                return Err(generation_failure(plan.name, detail));
            }
        }
        Ok(())
    }

    fn step_width(&self, op: Op) -> Option<usize> {
        match op {
            Op::I8 | Op::Enum { .. } => Some(1),
            Op::I16 | Op::Char16 => Some(2),
            Op::I32 | Op::F32 => Some(4),
            Op::I64 | Op::F64 => Some(8),
            Op::UnsignedI32(width) | Op::UnsignedI64(width) => Some(width.bytes()),
            Op::Text | Op::Bytes => None,
            Op::Record(index) => self.records[index].fixed_size,
        }
    }
}

/// Logs and builds the error for a broken generator invariant.
pub(crate) fn generation_failure(record: &'static str, detail: String) -> CodecError {
    tracing::error!(record, %detail, "codec generation failed");
    CodecError::CodecGenerationFailure { record, detail }
}
