//! The field-plan interpreter: decode, validate and encode.

use bytestream::{narrow_checked, ByteSink, ByteSource, UnsignedWidth};

use crate::error::{CodecError, CodecResult, LimitKind, ValueReason};
use crate::limits::CodecLimits;
use crate::plan::{generation_failure, CodecProgram, Op, RecordPlan, Step, ROOT};
use crate::value::Value;

impl CodecProgram {
    /// Decodes the root record with no size precheck.
    ///
    /// A short source surfaces as the source's own boundary error, possibly
    /// after earlier fields were consumed.
    pub(crate) fn decode_unchecked<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
        limits: &CodecLimits,
    ) -> CodecResult<Vec<Value>> {
        self.decode_record(ROOT, source, limits, 0)
    }

    /// Decodes the root record after checking the source holds its fixed size.
    ///
    /// Records without a fixed size fall through to the unchecked path.
    pub(crate) fn decode_checked<S: ByteSource + ?Sized>(
        &self,
        source: &mut S,
        limits: &CodecLimits,
    ) -> CodecResult<Vec<Value>> {
        let root = self.root();
        if let Some(needed) = root.fixed_size {
            let available = source.remaining();
            if available < needed {
                return Err(CodecError::InsufficientData {
                    record: root.name,
                    needed,
                    available,
                });
            }
        }
        self.decode_unchecked(source, limits)
    }

    /// Validates `values` against the root plan and returns the encoded length.
    pub(crate) fn encoded_len(&self, values: &[Value], limits: &CodecLimits) -> CodecResult<usize> {
        self.check_record(ROOT, values, limits, 0)
    }

    /// Encodes the root record. Nothing is written unless every value is valid.
    pub(crate) fn encode<K: ByteSink + ?Sized>(
        &self,
        sink: &mut K,
        values: &[Value],
        limits: &CodecLimits,
    ) -> CodecResult<usize> {
        let len = self.encoded_len(values, limits)?;
        self.write_record(ROOT, values, sink)?;
        Ok(len)
    }

    /// Descends into the plan at `index`. Only plans that can reach a cycle
    /// spend the nesting budget; acyclic depth is bounded by the schema.
    fn enter(&self, index: usize, depth: usize, limits: &CodecLimits) -> CodecResult<usize> {
        if !self.records[index].cyclic {
            return Ok(depth);
        }
        enter(depth, limits)
    }

    fn decode_record<S: ByteSource + ?Sized>(
        &self,
        index: usize,
        source: &mut S,
        limits: &CodecLimits,
        depth: usize,
    ) -> CodecResult<Vec<Value>> {
        let plan = &self.records[index];
        let mut values = Vec::with_capacity(plan.steps.len());
        for step in &plan.steps {
            values.push(self.decode_step(plan, step, source, limits, depth)?);
        }
        Ok(values)
    }

    fn decode_step<S: ByteSource + ?Sized>(
        &self,
        plan: &RecordPlan,
        step: &Step,
        source: &mut S,
        limits: &CodecLimits,
        depth: usize,
    ) -> CodecResult<Value> {
        let value = match step.op {
            Op::I8 => Value::I8(source.read_i8()?),
            Op::I16 => Value::I16(source.read_i16()?),
            Op::I32 => Value::I32(source.read_i32()?),
            Op::I64 => Value::I64(source.read_i64()?),
            Op::F32 => Value::F32(source.read_f32()?),
            Op::F64 => Value::F64(source.read_f64()?),
            Op::Char16 => Value::Char(source.read_u16()?),
            Op::UnsignedI32(width) => {
                // Analysis only admits U8 and U16 on 32-bit fields.
                let wide = source.read_unsigned(width)?;
                let value = i32::try_from(wide).map_err(|_| {
                    let detail = format!("{width:?} read on int32 field {}", step.field);
                    generation_failure(plan.name, detail)
                })?;
                Value::I32(value)
            }
            Op::UnsignedI64(width) => Value::I64(source.read_unsigned(width)?),
            Op::Enum { variants } => {
                let ordinal = usize::from(source.read_u8()?);
                if ordinal >= variants {
                    return Err(CodecError::OutOfRangeOrdinal {
                        record: plan.name,
                        field: step.field,
                        ordinal,
                        variants,
                    });
                }
                Value::Enum(ordinal)
            }
            Op::Text => {
                let bytes = read_variable(source, limits)?;
                let text = String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8 {
                    record: plan.name,
                    field: step.field,
                })?;
                Value::Text(text)
            }
            Op::Bytes => Value::Bytes(read_variable(source, limits)?),
            Op::Record(nested) => {
                let depth = self.enter(nested, depth, limits)?;
                Value::Record(self.decode_record(nested, source, limits, depth)?)
            }
        };
        Ok(value)
    }

    fn check_record(
        &self,
        index: usize,
        values: &[Value],
        limits: &CodecLimits,
        depth: usize,
    ) -> CodecResult<usize> {
        let plan = &self.records[index];
        if values.len() != plan.steps.len() {
            return Err(CodecError::FieldCountMismatch {
                record: plan.name,
                expected: plan.steps.len(),
                actual: values.len(),
            });
        }
        plan.steps
            .iter()
            .zip(values)
            .try_fold(0usize, |total, (step, value)| {
                let width = self.check_step(plan, step, value, limits, depth)?;
                Ok(total + width)
            })
    }

    fn check_step(
        &self,
        plan: &RecordPlan,
        step: &Step,
        value: &Value,
        limits: &CodecLimits,
        depth: usize,
    ) -> CodecResult<usize> {
        match (step.op, value) {
            (Op::I8, Value::I8(_)) => Ok(1),
            (Op::I16, Value::I16(_)) | (Op::Char16, Value::Char(_)) => Ok(2),
            (Op::I32, Value::I32(_)) | (Op::F32, Value::F32(_)) => Ok(4),
            (Op::I64, Value::I64(_)) | (Op::F64, Value::F64(_)) => Ok(8),
            (Op::UnsignedI32(width), Value::I32(v)) => {
                check_unsigned(plan, step, i64::from(*v), width)
            }
            (Op::UnsignedI64(width), Value::I64(v)) => check_unsigned(plan, step, *v, width),
            (Op::Enum { variants }, Value::Enum(ordinal)) => {
                if *ordinal >= variants {
                    return Err(CodecError::OutOfRangeOrdinal {
                        record: plan.name,
                        field: step.field,
                        ordinal: *ordinal,
                        variants,
                    });
                }
                Ok(1)
            }
            (Op::Text, Value::Text(text)) => check_variable(plan, step, text.len(), limits),
            (Op::Bytes, Value::Bytes(bytes)) => check_variable(plan, step, bytes.len(), limits),
            (Op::Record(nested), Value::Record(values)) => {
                let depth = self.enter(nested, depth, limits)?;
                self.check_record(nested, values, limits, depth)
            }
            (op, value) => Err(type_mismatch(plan, step, op, value)),
        }
    }

    fn write_record<K: ByteSink + ?Sized>(
        &self,
        index: usize,
        values: &[Value],
        sink: &mut K,
    ) -> CodecResult<()> {
        let plan = &self.records[index];
        for (step, value) in plan.steps.iter().zip(values) {
            match (step.op, value) {
                (Op::I8, Value::I8(v)) => sink.write_i8(*v)?,
                (Op::I16, Value::I16(v)) => sink.write_i16(*v)?,
                (Op::I32, Value::I32(v)) => sink.write_i32(*v)?,
                (Op::I64, Value::I64(v)) => sink.write_i64(*v)?,
                (Op::F32, Value::F32(v)) => sink.write_f32(*v)?,
                (Op::F64, Value::F64(v)) => sink.write_f64(*v)?,
                (Op::Char16, Value::Char(unit)) => sink.write_u16(*unit)?,
                (Op::UnsignedI32(width), Value::I32(v)) => {
                    sink.write_unsigned(i64::from(*v), width)?;
                }
                (Op::UnsignedI64(width), Value::I64(v)) => sink.write_unsigned(*v, width)?,
                (Op::Enum { variants }, Value::Enum(ordinal)) => {
                    let byte = u8::try_from(*ordinal).map_err(|_| CodecError::OutOfRangeOrdinal {
                        record: plan.name,
                        field: step.field,
                        ordinal: *ordinal,
                        variants,
                    })?;
                    sink.write_u8(byte)?;
                }
                (Op::Text, Value::Text(text)) => write_variable(plan, step, text.as_bytes(), sink)?,
                (Op::Bytes, Value::Bytes(bytes)) => write_variable(plan, step, bytes, sink)?,
                (Op::Record(nested), Value::Record(values)) => {
                    self.write_record(nested, values, sink)?;
                }
                (op, value) => return Err(type_mismatch(plan, step, op, value)),
            }
        }
        Ok(())
    }
}

fn enter(depth: usize, limits: &CodecLimits) -> CodecResult<usize> {
    let next = depth.saturating_add(1);
    if next > limits.max_nesting_depth {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::NestingDepth,
            limit: limits.max_nesting_depth,
            actual: next,
        });
    }
    Ok(next)
}

fn read_variable<S: ByteSource + ?Sized>(
    source: &mut S,
    limits: &CodecLimits,
) -> CodecResult<Vec<u8>> {
    let len = usize::from(source.read_u16()?);
    let max = limits.effective_variable_len();
    if len > max {
        return Err(CodecError::LimitsExceeded {
            kind: LimitKind::VariableLength,
            limit: max,
            actual: len,
        });
    }
    let mut bytes = vec![0u8; len];
    source.read_exact(&mut bytes)?;
    Ok(bytes)
}

fn write_variable<K: ByteSink + ?Sized>(
    plan: &RecordPlan,
    step: &Step,
    bytes: &[u8],
    sink: &mut K,
) -> CodecResult<()> {
    let len = u16::try_from(bytes.len()).map_err(|_| CodecError::InvalidValue {
        record: plan.name,
        field: step.field,
        reason: ValueReason::TooLong {
            len: bytes.len(),
            max: usize::from(u16::MAX),
        },
    })?;
    sink.write_u16(len)?;
    sink.write_all(bytes)?;
    Ok(())
}

fn check_unsigned(
    plan: &RecordPlan,
    step: &Step,
    value: i64,
    width: UnsignedWidth,
) -> CodecResult<usize> {
    narrow_checked(value, width).map_err(|_| CodecError::InvalidValue {
        record: plan.name,
        field: step.field,
        reason: ValueReason::UnsignedOutOfRange { width, value },
    })?;
    Ok(width.bytes())
}

fn check_variable(
    plan: &RecordPlan,
    step: &Step,
    len: usize,
    limits: &CodecLimits,
) -> CodecResult<usize> {
    let max = limits.effective_variable_len();
    if len > max {
        return Err(CodecError::InvalidValue {
            record: plan.name,
            field: step.field,
            reason: ValueReason::TooLong { len, max },
        });
    }
    Ok(2 + len)
}

fn type_mismatch(plan: &RecordPlan, step: &Step, op: Op, value: &Value) -> CodecError {
    CodecError::InvalidValue {
        record: plan.name,
        field: step.field,
        reason: ValueReason::TypeMismatch {
            expected: op.value_name(),
            found: value.kind_name(),
        },
    }
}
