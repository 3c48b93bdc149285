//! Borsh-compatible layout engine.
//!
//! [`TypeRegistry`] holds the user-defined types of one IDL and walks type
//! descriptors to encode a [`Value`] into bytes or decode it back. Every read
//! is length-checked before it reaches `borsh`, so short input always
//! surfaces as `TruncatedInput` and never as a partially populated value.

use std::collections::{HashMap, HashSet};

use borsh::{BorshDeserialize, BorshSerialize};
use solana_pubkey::Pubkey;

use crate::error::{CoderError, LayoutError, Result};
use crate::idl::{IdlEnumFields, IdlEnumVariant, IdlField, IdlType, IdlTypeDef, IdlTypeDefTy};
use crate::value::Value;

/// Deepest nesting of values the engine will walk.
pub const MAX_DEPTH: usize = 64;

const PUBKEY_LEN: usize = 32;
const LEN_PREFIX: usize = 4;

/// Name → definition index of an IDL's `types` section, validated once.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: HashMap<String, IdlTypeDefTy>,
    min_sizes: HashMap<String, usize>,
    fixed_sizes: HashMap<String, Option<usize>>,
}

impl TypeRegistry {
    /// Index and validate `defs`.
    ///
    /// Fails with `InvalidSchema` on duplicate type, field or variant names,
    /// references to undefined types, enums with no variants or more than 256,
    /// and types that contain themselves without `option`/`vec` in between.
    pub fn new(defs: &[IdlTypeDef]) -> Result<Self> {
        let mut types = HashMap::with_capacity(defs.len());
        for def in defs {
            if types.insert(def.name.clone(), def.ty.clone()).is_some() {
                return Err(CoderError::InvalidSchema(format!(
                    "duplicate type `{}`",
                    def.name
                )));
            }
        }

        let mut registry = Self {
            types,
            min_sizes: HashMap::new(),
            fixed_sizes: HashMap::new(),
        };

        for def in defs {
            let owner = format!("type `{}`", def.name);
            match &def.ty {
                IdlTypeDefTy::Struct { fields } => registry.check_fields(fields, &owner)?,
                IdlTypeDefTy::Enum { variants } => registry.check_variants(variants, &owner)?,
            }
        }

        for def in defs {
            let min = min_size_of_def(&registry.types, &def.name, &mut Vec::new());
            if min == usize::MAX {
                return Err(CoderError::InvalidSchema(format!(
                    "type `{}` contains itself without an option or vec indirection",
                    def.name
                )));
            }
            let fixed = fixed_size_of_def(&registry.types, &def.name, &mut Vec::new());
            registry.min_sizes.insert(def.name.clone(), min);
            registry.fixed_sizes.insert(def.name.clone(), fixed);
        }

        Ok(registry)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn get(&self, name: &str) -> Option<&IdlTypeDefTy> {
        self.types.get(name)
    }

    /// Type names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names.into_iter()
    }

    /// Validate an entry's field list: unique names, resolvable types.
    pub(crate) fn check_fields(&self, fields: &[IdlField], owner: &str) -> Result<()> {
        let mut seen = HashSet::new();
        for field in fields {
            if !seen.insert(field.name.as_str()) {
                return Err(CoderError::InvalidSchema(format!(
                    "{owner} declares field `{}` twice",
                    field.name
                )));
            }
            self.check_type(&field.ty, owner)?;
        }
        Ok(())
    }

    fn check_variants(&self, variants: &[IdlEnumVariant], owner: &str) -> Result<()> {
        if variants.is_empty() || variants.len() > usize::from(u8::MAX) + 1 {
            return Err(CoderError::InvalidSchema(format!(
                "{owner} must declare between 1 and 256 variants, found {}",
                variants.len()
            )));
        }
        let mut seen = HashSet::new();
        for variant in variants {
            if !seen.insert(variant.name.as_str()) {
                return Err(CoderError::InvalidSchema(format!(
                    "{owner} declares variant `{}` twice",
                    variant.name
                )));
            }
            match &variant.fields {
                None => {}
                Some(IdlEnumFields::Named(fields)) => self.check_fields(fields, owner)?,
                Some(IdlEnumFields::Tuple(types)) => {
                    for ty in types {
                        self.check_type(ty, owner)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn check_type(&self, ty: &IdlType, owner: &str) -> Result<()> {
        match ty {
            IdlType::Option(inner) | IdlType::Vec(inner) | IdlType::Array(inner, _) => {
                self.check_type(inner, owner)
            }
            IdlType::Defined(defined) if !self.types.contains_key(defined.name()) => {
                Err(CoderError::InvalidSchema(format!(
                    "{owner} references undefined type `{}`",
                    defined.name()
                )))
            }
            _ => Ok(()),
        }
    }

    /// Fewest bytes any value of `ty` can occupy.
    pub fn min_size(&self, ty: &IdlType) -> usize {
        match ty {
            IdlType::Defined(defined) => self
                .min_sizes
                .get(defined.name())
                .copied()
                .unwrap_or(usize::MAX),
            IdlType::Array(inner, len) => {
                if *len == 0 {
                    0
                } else {
                    self.min_size(inner).saturating_mul(*len)
                }
            }
            other => primitive_min_size(other),
        }
    }

    pub fn fields_min_size(&self, fields: &[IdlField]) -> usize {
        fields
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(self.min_size(&f.ty)))
    }

    /// Encoded size when every value of `ty` has the same length.
    pub fn fixed_size(&self, ty: &IdlType) -> Option<usize> {
        match ty {
            IdlType::Defined(defined) => self.fixed_sizes.get(defined.name()).copied().flatten(),
            IdlType::Array(inner, len) => self.fixed_size(inner)?.checked_mul(*len),
            IdlType::Option(_) | IdlType::Vec(_) | IdlType::Bytes | IdlType::String => None,
            other => Some(primitive_min_size(other)),
        }
    }

    pub fn fields_fixed_size(&self, fields: &[IdlField]) -> Option<usize> {
        fields
            .iter()
            .try_fold(0usize, |acc, f| acc.checked_add(self.fixed_size(&f.ty)?))
    }

    /// Encode `value` as `ty`.
    pub fn encode(&self, ty: &IdlType, value: &Value) -> Result<Vec<u8>, LayoutError> {
        let mut out = Vec::new();
        self.encode_value(ty, value, &mut out, 0)?;
        Ok(out)
    }

    /// Decode one `ty` from the front of `buf`, advancing it past the bytes read.
    pub fn decode(&self, ty: &IdlType, buf: &mut &[u8]) -> Result<Value, LayoutError> {
        self.decode_value(ty, buf, 0)
    }

    /// Encode a struct value against a field list, in declared order.
    pub fn encode_fields(
        &self,
        fields: &[IdlField],
        value: &Value,
        out: &mut Vec<u8>,
    ) -> Result<(), LayoutError> {
        self.encode_struct(fields, value, out, 0)
    }

    pub fn decode_fields(&self, fields: &[IdlField], buf: &mut &[u8]) -> Result<Value, LayoutError> {
        self.decode_struct(fields, buf, 0)
    }

    fn encode_value(
        &self,
        ty: &IdlType,
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), LayoutError> {
        if depth > MAX_DEPTH {
            return Err(LayoutError::shape(format!(
                "value nests deeper than {MAX_DEPTH} levels"
            )));
        }
        match ty {
            IdlType::Bool => match value {
                Value::Bool(v) => write(v, out),
                other => Err(expected("bool", other)),
            },
            IdlType::U8 => write(&(unsigned(value, u8::MAX.into())? as u8), out),
            IdlType::U16 => write(&(unsigned(value, u16::MAX.into())? as u16), out),
            IdlType::U32 => write(&(unsigned(value, u32::MAX.into())? as u32), out),
            IdlType::U64 => write(&(unsigned(value, u64::MAX.into())? as u64), out),
            IdlType::U128 => write(&unsigned(value, u128::MAX)?, out),
            IdlType::I8 => write(&(signed(value, i8::MIN.into(), i8::MAX.into())? as i8), out),
            IdlType::I16 => write(&(signed(value, i16::MIN.into(), i16::MAX.into())? as i16), out),
            IdlType::I32 => write(&(signed(value, i32::MIN.into(), i32::MAX.into())? as i32), out),
            IdlType::I64 => write(&(signed(value, i64::MIN.into(), i64::MAX.into())? as i64), out),
            IdlType::I128 => write(&signed(value, i128::MIN, i128::MAX)?, out),
            IdlType::F32 => match value {
                Value::Float(v) => {
                    let narrow = *v as f32;
                    if narrow.is_infinite() && v.is_finite() {
                        return Err(LayoutError::shape(format!("{v} is out of range for f32")));
                    }
                    write(&narrow, out)
                }
                other => Err(expected("float", other)),
            },
            IdlType::F64 => match value {
                Value::Float(v) => write(v, out),
                other => Err(expected("float", other)),
            },
            IdlType::String => match value {
                Value::String(s) => write_prefixed(s.as_bytes(), out),
                other => Err(expected("string", other)),
            },
            IdlType::Bytes => match value {
                Value::Bytes(bytes) => write_prefixed(bytes, out),
                other => Err(expected("bytes", other)),
            },
            IdlType::Pubkey => match value {
                Value::Pubkey(key) => {
                    out.extend_from_slice(key.as_ref());
                    Ok(())
                }
                Value::String(s) => {
                    let key: Pubkey = s
                        .parse()
                        .map_err(|err| LayoutError::shape(format!("invalid pubkey `{s}`: {err}")))?;
                    out.extend_from_slice(key.as_ref());
                    Ok(())
                }
                other => Err(expected("pubkey", other)),
            },
            IdlType::Option(inner) => match value {
                Value::Option(None) => write(&0u8, out),
                Value::Option(Some(v)) => {
                    write(&1u8, out)?;
                    self.encode_value(inner, v, out, depth + 1)
                }
                other => Err(expected("option", other)),
            },
            IdlType::Vec(inner) => {
                if let (IdlType::U8, Value::Bytes(bytes)) = (inner.as_ref(), value) {
                    return write_prefixed(bytes, out);
                }
                let Value::Array(items) = value else {
                    return Err(expected("array", value));
                };
                let len = u32::try_from(items.len())
                    .map_err(|_| LayoutError::shape("vec longer than u32::MAX elements"))?;
                write(&len, out)?;
                self.encode_items(inner, items, out, depth)
            }
            IdlType::Array(inner, len) => {
                if let (IdlType::U8, Value::Bytes(bytes)) = (inner.as_ref(), value) {
                    if bytes.len() != *len {
                        return Err(LayoutError::shape(format!(
                            "expected {len} bytes, found {}",
                            bytes.len()
                        )));
                    }
                    out.extend_from_slice(bytes);
                    return Ok(());
                }
                let Value::Array(items) = value else {
                    return Err(expected("array", value));
                };
                if items.len() != *len {
                    return Err(LayoutError::shape(format!(
                        "expected array of length {len}, found {}",
                        items.len()
                    )));
                }
                self.encode_items(inner, items, out, depth)
            }
            IdlType::Defined(defined) => match self.types.get(defined.name()) {
                Some(IdlTypeDefTy::Struct { fields }) => {
                    self.encode_struct(fields, value, out, depth + 1)
                }
                Some(IdlTypeDefTy::Enum { variants }) => {
                    self.encode_enum(variants, value, out, depth + 1)
                }
                None => Err(LayoutError::shape(format!(
                    "undefined type `{}`",
                    defined.name()
                ))),
            },
        }
    }

    fn encode_items(
        &self,
        inner: &IdlType,
        items: &[Value],
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), LayoutError> {
        for (i, item) in items.iter().enumerate() {
            self.encode_value(inner, item, out, depth + 1)
                .map_err(|e| e.at(&format!("[{i}]")))?;
        }
        Ok(())
    }

    fn encode_struct(
        &self,
        fields: &[IdlField],
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), LayoutError> {
        let Value::Struct(given) = value else {
            return Err(expected("struct", value));
        };
        if let Some((name, _)) = given
            .iter()
            .find(|(name, _)| !fields.iter().any(|f| &f.name == name))
        {
            return Err(LayoutError::shape("unknown field").at(name));
        }
        for field in fields {
            let v = given
                .iter()
                .find(|(name, _)| name == &field.name)
                .map(|(_, v)| v)
                .ok_or_else(|| LayoutError::shape("missing field").at(&field.name))?;
            self.encode_value(&field.ty, v, out, depth + 1)
                .map_err(|e| e.at(&field.name))?;
        }
        Ok(())
    }

    fn encode_enum(
        &self,
        variants: &[IdlEnumVariant],
        value: &Value,
        out: &mut Vec<u8>,
        depth: usize,
    ) -> Result<(), LayoutError> {
        let Value::Enum { variant, fields } = value else {
            return Err(expected("enum", value));
        };
        let (index, def) = variants
            .iter()
            .enumerate()
            .find(|(_, v)| &v.name == variant)
            .ok_or_else(|| LayoutError::shape(format!("unknown variant `{variant}`")))?;
        // At most 256 variants, checked at construction.
        write(&(index as u8), out)?;

        match (&def.fields, fields.as_deref()) {
            (None, None) => Ok(()),
            (Some(IdlEnumFields::Named(defs)), Some(v)) => self
                .encode_struct(defs, v, out, depth + 1)
                .map_err(|e| e.at(variant)),
            (Some(IdlEnumFields::Named(defs)), None) if defs.is_empty() => Ok(()),
            (Some(IdlEnumFields::Tuple(types)), Some(Value::Array(items))) => {
                if items.len() != types.len() {
                    return Err(LayoutError::shape(format!(
                        "expected {} tuple fields, found {}",
                        types.len(),
                        items.len()
                    ))
                    .at(variant));
                }
                for (i, (ty, item)) in types.iter().zip(items).enumerate() {
                    self.encode_value(ty, item, out, depth + 1)
                        .map_err(|e| e.at(&format!("[{i}]")).at(variant))?;
                }
                Ok(())
            }
            (None, Some(_)) => Err(LayoutError::shape("variant takes no fields").at(variant)),
            _ => Err(LayoutError::shape("variant fields do not match declaration").at(variant)),
        }
    }

    fn decode_value(&self, ty: &IdlType, buf: &mut &[u8], depth: usize) -> Result<Value, LayoutError> {
        if depth > MAX_DEPTH {
            return Err(LayoutError::shape(format!(
                "value nests deeper than {MAX_DEPTH} levels"
            )));
        }
        let value = match ty {
            IdlType::Bool => Value::Bool(read(buf, 1)?),
            IdlType::U8 => Value::from(read::<u8>(buf, 1)?),
            IdlType::U16 => Value::from(read::<u16>(buf, 2)?),
            IdlType::U32 => Value::from(read::<u32>(buf, 4)?),
            IdlType::U64 => Value::from(read::<u64>(buf, 8)?),
            IdlType::U128 => Value::from(read::<u128>(buf, 16)?),
            IdlType::I8 => Value::from(read::<i8>(buf, 1)?),
            IdlType::I16 => Value::from(read::<i16>(buf, 2)?),
            IdlType::I32 => Value::from(read::<i32>(buf, 4)?),
            IdlType::I64 => Value::from(read::<i64>(buf, 8)?),
            IdlType::I128 => Value::from(read::<i128>(buf, 16)?),
            IdlType::F32 => Value::from(read::<f32>(buf, 4)?),
            IdlType::F64 => Value::from(read::<f64>(buf, 8)?),
            IdlType::String => {
                let bytes = read_prefixed(buf)?;
                let s = std::str::from_utf8(bytes)
                    .map_err(|err| LayoutError::shape(format!("invalid utf-8: {err}")))?;
                Value::String(s.to_string())
            }
            IdlType::Bytes => Value::Bytes(read_prefixed(buf)?.to_vec()),
            IdlType::Pubkey => {
                let bytes: [u8; PUBKEY_LEN] = read(buf, PUBKEY_LEN)?;
                Value::Pubkey(Pubkey::new_from_array(bytes))
            }
            IdlType::Option(inner) => match read::<u8>(buf, 1)? {
                0 => Value::none(),
                1 => Value::some(self.decode_value(inner, buf, depth + 1)?),
                tag => return Err(LayoutError::shape(format!("invalid option tag {tag}"))),
            },
            IdlType::Vec(inner) => {
                let len = read::<u32>(buf, LEN_PREFIX)? as usize;
                self.check_count(inner, len, buf)?;
                Value::Array(self.decode_items(inner, len, buf, depth)?)
            }
            IdlType::Array(inner, len) => {
                self.check_count(inner, *len, buf)?;
                Value::Array(self.decode_items(inner, *len, buf, depth)?)
            }
            IdlType::Defined(defined) => match self.types.get(defined.name()) {
                Some(IdlTypeDefTy::Struct { fields }) => self.decode_struct(fields, buf, depth + 1)?,
                Some(IdlTypeDefTy::Enum { variants }) => self.decode_enum(variants, buf, depth + 1)?,
                None => {
                    return Err(LayoutError::shape(format!(
                        "undefined type `{}`",
                        defined.name()
                    )))
                }
            },
        };
        Ok(value)
    }

    /// Every element counts as at least one byte, so a declared count can
    /// never outgrow the input it is decoded from.
    fn check_count(&self, inner: &IdlType, len: usize, buf: &[u8]) -> Result<(), LayoutError> {
        let needed = len.saturating_mul(self.min_size(inner).max(1));
        if needed > buf.len() {
            return Err(LayoutError::truncated(needed, buf.len()));
        }
        Ok(())
    }

    fn decode_items(
        &self,
        inner: &IdlType,
        len: usize,
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<Vec<Value>, LayoutError> {
        let mut items = Vec::with_capacity(len.min(buf.len()));
        for i in 0..len {
            let item = self
                .decode_value(inner, buf, depth + 1)
                .map_err(|e| e.at(&format!("[{i}]")))?;
            items.push(item);
        }
        Ok(items)
    }

    fn decode_struct(
        &self,
        fields: &[IdlField],
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<Value, LayoutError> {
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            let value = self
                .decode_value(&field.ty, buf, depth + 1)
                .map_err(|e| e.at(&field.name))?;
            values.push((field.name.clone(), value));
        }
        Ok(Value::Struct(values))
    }

    fn decode_enum(
        &self,
        variants: &[IdlEnumVariant],
        buf: &mut &[u8],
        depth: usize,
    ) -> Result<Value, LayoutError> {
        let tag = read::<u8>(buf, 1)?;
        let def = variants
            .get(usize::from(tag))
            .ok_or_else(|| LayoutError::shape(format!("invalid enum tag {tag}")))?;

        let fields = match &def.fields {
            None => None,
            Some(IdlEnumFields::Named(defs)) => Some(
                self.decode_struct(defs, buf, depth + 1)
                    .map_err(|e| e.at(&def.name))?,
            ),
            Some(IdlEnumFields::Tuple(types)) => {
                let mut items = Vec::with_capacity(types.len());
                for (i, ty) in types.iter().enumerate() {
                    let item = self
                        .decode_value(ty, buf, depth + 1)
                        .map_err(|e| e.at(&format!("[{i}]")).at(&def.name))?;
                    items.push(item);
                }
                Some(Value::Array(items))
            }
        };
        Ok(Value::Enum {
            variant: def.name.clone(),
            fields: fields.map(Box::new),
        })
    }
}

fn primitive_min_size(ty: &IdlType) -> usize {
    match ty {
        IdlType::Bool | IdlType::U8 | IdlType::I8 | IdlType::Option(_) => 1,
        IdlType::U16 | IdlType::I16 => 2,
        IdlType::U32 | IdlType::I32 | IdlType::F32 => 4,
        IdlType::U64 | IdlType::I64 | IdlType::F64 => 8,
        IdlType::U128 | IdlType::I128 => 16,
        IdlType::String | IdlType::Bytes | IdlType::Vec(_) => LEN_PREFIX,
        IdlType::Pubkey => PUBKEY_LEN,
        // Resolved through the registry.
        IdlType::Array(..) | IdlType::Defined(_) => 0,
    }
}

/// Minimum size of a defined type. Re-entering a type already on `stack`
/// yields `usize::MAX`, so a recursive enum variant never wins the minimum and
/// a type with no finite layout saturates.
fn min_size_of_def(
    types: &HashMap<String, IdlTypeDefTy>,
    name: &str,
    stack: &mut Vec<String>,
) -> usize {
    if stack.iter().any(|n| n == name) {
        return usize::MAX;
    }
    let Some(def) = types.get(name) else {
        return usize::MAX;
    };
    stack.push(name.to_string());
    let size = match def {
        IdlTypeDefTy::Struct { fields } => fields.iter().fold(0usize, |acc, f| {
            acc.saturating_add(min_size_of_type(types, &f.ty, stack))
        }),
        IdlTypeDefTy::Enum { variants } => variants
            .iter()
            .map(|v| variant_size(v, |ty| min_size_of_type(types, ty, stack)))
            .min()
            .map_or(usize::MAX, |s| s.saturating_add(1)),
    };
    stack.pop();
    size
}

fn min_size_of_type(
    types: &HashMap<String, IdlTypeDefTy>,
    ty: &IdlType,
    stack: &mut Vec<String>,
) -> usize {
    match ty {
        IdlType::Defined(defined) => min_size_of_def(types, defined.name(), stack),
        IdlType::Array(_, 0) => 0,
        IdlType::Array(inner, len) => min_size_of_type(types, inner, stack).saturating_mul(*len),
        other => primitive_min_size(other),
    }
}

fn variant_size(variant: &IdlEnumVariant, mut size_of: impl FnMut(&IdlType) -> usize) -> usize {
    match &variant.fields {
        None => 0,
        Some(IdlEnumFields::Named(fields)) => fields
            .iter()
            .fold(0usize, |acc, f| acc.saturating_add(size_of(&f.ty))),
        Some(IdlEnumFields::Tuple(types)) => types
            .iter()
            .fold(0usize, |acc, ty| acc.saturating_add(size_of(ty))),
    }
}

fn fixed_size_of_def(
    types: &HashMap<String, IdlTypeDefTy>,
    name: &str,
    stack: &mut Vec<String>,
) -> Option<usize> {
    if stack.iter().any(|n| n == name) {
        return None;
    }
    let def = types.get(name)?;
    stack.push(name.to_string());
    let size = match def {
        IdlTypeDefTy::Struct { fields } => fields.iter().try_fold(0usize, |acc, f| {
            acc.checked_add(fixed_size_of_type(types, &f.ty, stack)?)
        }),
        IdlTypeDefTy::Enum { variants } => {
            let mut sizes = Vec::with_capacity(variants.len());
            for v in variants {
                let fields: Vec<&IdlType> = match &v.fields {
                    None => Vec::new(),
                    Some(IdlEnumFields::Named(fields)) => fields.iter().map(|f| &f.ty).collect(),
                    Some(IdlEnumFields::Tuple(tys)) => tys.iter().collect(),
                };
                let size = fields.into_iter().try_fold(0usize, |acc, ty| {
                    acc.checked_add(fixed_size_of_type(types, ty, stack)?)
                });
                sizes.push(size);
            }
            match sizes.first().copied().flatten() {
                Some(first) if sizes.iter().all(|s| *s == Some(first)) => first.checked_add(1),
                _ => None,
            }
        }
    };
    stack.pop();
    size
}

fn fixed_size_of_type(
    types: &HashMap<String, IdlTypeDefTy>,
    ty: &IdlType,
    stack: &mut Vec<String>,
) -> Option<usize> {
    match ty {
        IdlType::Defined(defined) => fixed_size_of_def(types, defined.name(), stack),
        IdlType::Array(inner, len) => fixed_size_of_type(types, inner, stack)?.checked_mul(*len),
        IdlType::Option(_) | IdlType::Vec(_) | IdlType::Bytes | IdlType::String => None,
        other => Some(primitive_min_size(other)),
    }
}

fn expected(what: &str, found: &Value) -> LayoutError {
    LayoutError::shape(format!("expected {what}, found {}", found.type_name()))
}

fn unsigned(value: &Value, max: u128) -> Result<u128, LayoutError> {
    let v = match value {
        Value::Uint(v) => *v,
        Value::Int(v) if *v >= 0 => *v as u128,
        other => return Err(expected("unsigned integer", other)),
    };
    if v > max {
        return Err(LayoutError::shape(format!("{v} exceeds maximum {max}")));
    }
    Ok(v)
}

fn signed(value: &Value, min: i128, max: i128) -> Result<i128, LayoutError> {
    let v = match value {
        Value::Int(v) => *v,
        Value::Uint(v) => i128::try_from(*v)
            .map_err(|_| LayoutError::shape(format!("{v} exceeds maximum {max}")))?,
        other => return Err(expected("signed integer", other)),
    };
    if v < min || v > max {
        return Err(LayoutError::shape(format!("{v} outside range {min}..={max}")));
    }
    Ok(v)
}

fn write<T: BorshSerialize>(value: &T, out: &mut Vec<u8>) -> Result<(), LayoutError> {
    value
        .serialize(out)
        .map_err(|err| LayoutError::shape(err.to_string()))
}

fn write_prefixed(bytes: &[u8], out: &mut Vec<u8>) -> Result<(), LayoutError> {
    let len = u32::try_from(bytes.len())
        .map_err(|_| LayoutError::shape("length exceeds u32::MAX"))?;
    write(&len, out)?;
    out.extend_from_slice(bytes);
    Ok(())
}

fn take<'a>(buf: &mut &'a [u8], n: usize) -> Result<&'a [u8], LayoutError> {
    if buf.len() < n {
        return Err(LayoutError::truncated(n, buf.len()));
    }
    let (head, tail) = buf.split_at(n);
    *buf = tail;
    Ok(head)
}

/// Read a `size`-byte borsh primitive. The length check happens first so
/// `borsh` only ever sees complete input; anything it still rejects (bool
/// bytes above 1, NaN floats) is a shape mismatch.
fn read<T: BorshDeserialize>(buf: &mut &[u8], size: usize) -> Result<T, LayoutError> {
    let mut bytes = take(buf, size)?;
    T::deserialize(&mut bytes).map_err(|err| LayoutError::shape(err.to_string()))
}

fn read_prefixed<'a>(buf: &mut &'a [u8]) -> Result<&'a [u8], LayoutError> {
    let len = read::<u32>(buf, LEN_PREFIX)? as usize;
    take(buf, len)
}
