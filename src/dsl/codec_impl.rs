//! Compiles a [`super::TypeTemplate`] into a [`Codec`] over [`DynValue`].
//!
//! Every composite template (`and`, `taggedChoice`, `list`, ...) is compiled structurally: a
//! product writes/reads each member's named field independently and merges the fragments;
//! `remainder` captures whatever map entries the named siblings didn't claim so forward
//! migrations never have to know the full shape of a type to preserve what they don't touch.

use crate::{
    codec::Codec,
    dsl::{
        DynValue,
        TemplateKind,
        TypeFamily,
        TypeTemplate,
    },
    dynamic::Dynamic,
    ops::{
        DynamicOps,
        Number,
    },
    result::{
        DataResult,
        Pair,
    },
    type_ref::TypeReference,
};

impl TypeTemplate {
    /// Compiles this template into a [`Codec`] bridging [`DynValue`] and a concrete backend,
    /// resolving [`TemplateKind::Reference`] members against `family`.
    pub fn codec(&self, family: &TypeFamily) -> TemplateCodec {
        TemplateCodec::new(self.clone(), family.clone())
    }
}

/// A [`Codec<DynValue, T, O>`] compiled from a [`TypeTemplate`].
pub struct TemplateCodec {
    template: TypeTemplate,
    family: TypeFamily,
}

impl TemplateCodec {
    pub(crate) fn new(template: TypeTemplate, family: TypeFamily) -> Self {
        Self { template, family }
    }
}

impl<T: Clone, O: DynamicOps<T>> Codec<DynValue, T, O> for TemplateCodec {
    fn encode(&self, value: &DynValue, prefix: Dynamic<T, O>) -> DataResult<Dynamic<T, O>> {
        let ops = prefix.ops().clone();
        encode_kind(self.template.kind(), &self.family, value, &ops).map(|fresh| merge_with_prefix(&ops, prefix, fresh))
    }

    fn decode(&self, input: &Dynamic<T, O>) -> DataResult<Pair<DynValue, Dynamic<T, O>>> {
        decode_kind(self.template.kind(), &self.family, input).map(|v| Pair(v, input.clone()))
    }
}

fn merge_with_prefix<T: Clone, O: DynamicOps<T>>(ops: &O, prefix: Dynamic<T, O>, fresh: Dynamic<T, O>) -> Dynamic<T, O> {
    if ops.is_map(prefix.value()) && ops.is_map(fresh.value()) {
        match ops.merge_to_map(prefix.value(), fresh.value()) {
            DataResult::Success(merged) | DataResult::Partial(merged, _) => Dynamic::new(ops.clone(), merged),
            DataResult::Error(_) => fresh,
        }
    } else {
        fresh
    }
}

fn known_names(members: &[TypeTemplate]) -> Vec<String> {
    members
        .iter()
        .filter_map(|m| match m.kind() {
            TemplateKind::Field { name, .. } | TemplateKind::Optional { name, .. } => Some(name.clone()),
            TemplateKind::TaggedChoice { discriminator, .. } => Some(discriminator.clone()),
            _ => None,
        })
        .collect()
}

fn encode_kind<T: Clone, O: DynamicOps<T>>(
    kind: &TemplateKind,
    family: &TypeFamily,
    value: &DynValue,
    ops: &O,
) -> DataResult<Dynamic<T, O>> {
    match kind {
        TemplateKind::String => match value {
            DynValue::String(s) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_string(s))),
            other => DataResult::Error(format!("expected a string, got {other:?}")),
        },
        TemplateKind::Int => match value {
            DynValue::Int(v) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_int(*v))),
            other => DataResult::Error(format!("expected an int, got {other:?}")),
        },
        TemplateKind::Long => match value {
            DynValue::Long(v) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_long(*v))),
            other => DataResult::Error(format!("expected a long, got {other:?}")),
        },
        TemplateKind::Float => match value {
            DynValue::Float(v) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_float(*v))),
            other => DataResult::Error(format!("expected a float, got {other:?}")),
        },
        TemplateKind::Double => match value {
            DynValue::Double(v) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_double(*v))),
            other => DataResult::Error(format!("expected a double, got {other:?}")),
        },
        TemplateKind::Bool => match value {
            DynValue::Bool(v) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_boolean(*v))),
            other => DataResult::Error(format!("expected a bool, got {other:?}")),
        },
        TemplateKind::Byte => match value {
            DynValue::Byte(v) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_byte(*v))),
            other => DataResult::Error(format!("expected a byte, got {other:?}")),
        },
        TemplateKind::Short => match value {
            DynValue::Short(v) => DataResult::Success(Dynamic::new(ops.clone(), ops.create_short(*v))),
            other => DataResult::Error(format!("expected a short, got {other:?}")),
        },
        TemplateKind::Field { name, inner } => {
            let Some(sub_value) = value.field(name) else {
                return DataResult::Error(format!("missing field: {name}"));
            };
            encode_kind(inner.kind(), family, sub_value, ops)
                .map(|child| Dynamic::new(ops.clone(), ops.empty_map()).set(name, child))
        }
        TemplateKind::Optional { name, inner } => match value.field(name) {
            Some(sub_value) => encode_kind(inner.kind(), family, sub_value, ops)
                .map(|child| Dynamic::new(ops.clone(), ops.empty_map()).set(name, child)),
            None => DataResult::Success(Dynamic::new(ops.clone(), ops.empty_map())),
        },
        TemplateKind::And(members) => encode_and(members, family, value, ops),
        TemplateKind::List(inner) => match value {
            DynValue::List(items) => {
                let mut encoded = Vec::with_capacity(items.len());
                let mut warnings = Vec::new();
                for item in items {
                    match encode_kind(inner.kind(), family, item, ops) {
                        DataResult::Success(d) => encoded.push(d.into_value()),
                        DataResult::Partial(d, m) => {
                            encoded.push(d.into_value());
                            warnings.push(m);
                        }
                        DataResult::Error(m) => return DataResult::Error(m),
                    }
                }
                let list = Dynamic::new(ops.clone(), ops.create_list(encoded));
                if warnings.is_empty() {
                    DataResult::Success(list)
                } else {
                    DataResult::Partial(list, warnings.join("; "))
                }
            }
            other => DataResult::Error(format!("expected a list, got {other:?}")),
        },
        TemplateKind::TaggedChoice { discriminator, variants } => match value {
            DynValue::Tagged(tag, inner) => match variants.iter().find(|(name, _)| name == tag) {
                Some((_, variant_template)) => {
                    encode_kind(variant_template.kind(), family, inner, ops)
                        .map(|fragment| fragment.set(discriminator, Dynamic::new(ops.clone(), ops.create_string(tag))))
                }
                None => DataResult::Error(format!("unknown variant tag: {tag}")),
            },
            other => DataResult::Error(format!("expected a tagged value, got {other:?}")),
        },
        TemplateKind::Remainder => DataResult::Success(encode_any(value, ops)),
        TemplateKind::Reference(type_ref) => match resolve(family, type_ref) {
            Some(resolved) => encode_kind(resolved.kind(), family, value, ops),
            None => DataResult::Error(format!("unresolved type reference: {type_ref}")),
        },
    }
}

fn encode_and<T: Clone, O: DynamicOps<T>>(
    members: &[TypeTemplate],
    family: &TypeFamily,
    value: &DynValue,
    ops: &O,
) -> DataResult<Dynamic<T, O>> {
    let known = known_names(members);
    let mut current = Dynamic::new(ops.clone(), ops.empty_map());
    let mut warnings = Vec::new();

    for member in members {
        if let TemplateKind::Remainder = member.kind() {
            if let DynValue::Record(fields) = value {
                for (name, v) in fields {
                    if known.contains(name) {
                        continue;
                    }
                    current = current.set(name, encode_any(v, ops));
                }
            }
            continue;
        }

        if let TemplateKind::TaggedChoice { discriminator, .. } = member.kind() {
            let Some(tagged) = value.field(discriminator) else {
                return DataResult::Error(format!("missing field: {discriminator}"));
            };
            match encode_kind(member.kind(), family, tagged, ops) {
                DataResult::Success(fragment) => current = merge_fragment(current, fragment),
                DataResult::Partial(fragment, m) => {
                    current = merge_fragment(current, fragment);
                    warnings.push(m);
                }
                DataResult::Error(m) => return DataResult::Error(m),
            }
            continue;
        }

        match encode_kind(member.kind(), family, value, ops) {
            DataResult::Success(fragment) => current = merge_fragment(current, fragment),
            DataResult::Partial(fragment, m) => {
                current = merge_fragment(current, fragment);
                warnings.push(m);
            }
            DataResult::Error(m) => return DataResult::Error(m),
        }
    }

    if warnings.is_empty() {
        DataResult::Success(current)
    } else {
        DataResult::Partial(current, warnings.join("; "))
    }
}

fn merge_fragment<T: Clone, O: DynamicOps<T>>(current: Dynamic<T, O>, fragment: Dynamic<T, O>) -> Dynamic<T, O> {
    match fragment.as_map() {
        DataResult::Success(entries) | DataResult::Partial(entries, _) => {
            let mut merged = current;
            for (k, v) in entries {
                merged = merged.set(&k, v);
            }
            merged
        }
        DataResult::Error(_) => current,
    }
}

fn decode_kind<T, O: DynamicOps<T>>(kind: &TemplateKind, family: &TypeFamily, dynamic: &Dynamic<T, O>) -> DataResult<DynValue> {
    match kind {
        TemplateKind::String => dynamic.as_string().map(DynValue::String),
        TemplateKind::Int => dynamic.as_int().map(DynValue::Int),
        TemplateKind::Long => dynamic.as_long().map(DynValue::Long),
        TemplateKind::Float => dynamic.as_float().map(DynValue::Float),
        TemplateKind::Double => dynamic.as_double().map(DynValue::Double),
        TemplateKind::Bool => dynamic.as_boolean().map(DynValue::Bool),
        TemplateKind::Byte => dynamic.as_int().map(|v| DynValue::Byte(v as i8)),
        TemplateKind::Short => dynamic.as_int().map(|v| DynValue::Short(v as i16)),
        TemplateKind::Field { name, inner } => {
            if !dynamic.has(name) {
                return DataResult::Error(format!("missing field: {name}"));
            }
            decode_kind(inner.kind(), family, &dynamic.get(name)).map(|v| DynValue::Record(vec![(name.clone(), v)]))
        }
        TemplateKind::Optional { name, inner } => {
            if dynamic.has(name) {
                decode_kind(inner.kind(), family, &dynamic.get(name)).map(|v| DynValue::Record(vec![(name.clone(), v)]))
            } else {
                DataResult::Success(DynValue::Record(Vec::new()))
            }
        }
        TemplateKind::And(members) => decode_and(members, family, dynamic),
        TemplateKind::List(inner) => dynamic.as_list().flat_map(|elements| {
            let mut out = Vec::with_capacity(elements.len());
            let mut warnings = Vec::new();
            for element in &elements {
                match decode_kind(inner.kind(), family, element) {
                    DataResult::Success(v) => out.push(v),
                    DataResult::Partial(v, m) => {
                        out.push(v);
                        warnings.push(m);
                    }
                    DataResult::Error(m) => return DataResult::Error(m),
                }
            }
            if warnings.is_empty() {
                DataResult::Success(DynValue::List(out))
            } else {
                DataResult::Partial(DynValue::List(out), warnings.join("; "))
            }
        }),
        TemplateKind::TaggedChoice { discriminator, variants } => {
            let tag = match dynamic.get(discriminator).as_string() {
                DataResult::Success(t) | DataResult::Partial(t, _) => t,
                DataResult::Error(m) => return DataResult::Error(m),
            };
            match variants.iter().find(|(name, _)| *name == tag) {
                Some((_, variant_template)) => {
                    decode_kind(variant_template.kind(), family, dynamic).map(|v| DynValue::Tagged(tag, Box::new(v)))
                }
                None => DataResult::Error(format!("unknown variant tag: {tag}")),
            }
        }
        TemplateKind::Remainder => DataResult::Success(decode_any(dynamic)),
        TemplateKind::Reference(type_ref) => match resolve(family, type_ref) {
            Some(resolved) => decode_kind(resolved.kind(), family, dynamic),
            None => DataResult::Error(format!("unresolved type reference: {type_ref}")),
        },
    }
}

fn decode_and<T, O: DynamicOps<T>>(members: &[TypeTemplate], family: &TypeFamily, dynamic: &Dynamic<T, O>) -> DataResult<DynValue> {
    let known = known_names(members);
    let mut fields = Vec::new();
    let mut warnings = Vec::new();

    for member in members {
        match member.kind() {
            TemplateKind::Remainder => {
                if let DataResult::Success(entries) | DataResult::Partial(entries, _) = dynamic.as_map() {
                    for (name, child) in entries {
                        if known.contains(&name) {
                            continue;
                        }
                        fields.push((name, decode_any(&child)));
                    }
                }
            }
            TemplateKind::TaggedChoice { discriminator, .. } => match decode_kind(member.kind(), family, dynamic) {
                DataResult::Success(v) => fields.push((discriminator.clone(), v)),
                DataResult::Partial(v, m) => {
                    fields.push((discriminator.clone(), v));
                    warnings.push(m);
                }
                DataResult::Error(m) => return DataResult::Error(m),
            },
            _ => match decode_kind(member.kind(), family, dynamic) {
                DataResult::Success(DynValue::Record(mut mf)) => fields.append(&mut mf),
                DataResult::Partial(DynValue::Record(mut mf), m) => {
                    fields.append(&mut mf);
                    warnings.push(m);
                }
                DataResult::Success(_) | DataResult::Partial(_, _) => {}
                DataResult::Error(m) => return DataResult::Error(m),
            },
        }
    }

    if warnings.is_empty() {
        DataResult::Success(DynValue::Record(fields))
    } else {
        DataResult::Partial(DynValue::Record(fields), warnings.join("; "))
    }
}

fn resolve<'a>(family: &'a TypeFamily, type_ref: &TypeReference) -> Option<&'a TypeTemplate> {
    family.resolve(type_ref)
}

/// Structurally decodes a node with no associated template, preserving shape so that unknown
/// fields captured by [`TemplateKind::Remainder`] round-trip through [`encode_any`] unchanged.
fn decode_any<T, O: DynamicOps<T>>(dynamic: &Dynamic<T, O>) -> DynValue {
    if let DataResult::Success(s) = dynamic.as_string() {
        return DynValue::String(s);
    }
    if let DataResult::Success(b) = dynamic.as_boolean() {
        return DynValue::Bool(b);
    }
    if let DataResult::Success(n) = dynamic.ops().get_number_value(dynamic.value()) {
        return match n {
            Number::Byte(v) => DynValue::Byte(v),
            Number::Short(v) => DynValue::Short(v),
            Number::Int(v) => DynValue::Int(v),
            Number::Long(v) => DynValue::Long(v),
            Number::Float(v) => DynValue::Float(v),
            Number::Double(v) => DynValue::Double(v),
        };
    }
    if let DataResult::Success(items) = dynamic.as_list() {
        return DynValue::List(items.iter().map(decode_any).collect());
    }
    if let DataResult::Success(entries) = dynamic.as_map() {
        return DynValue::Record(entries.into_iter().map(|(k, v)| (k, decode_any(&v))).collect());
    }
    DynValue::Record(Vec::new())
}

/// The inverse of [`decode_any`]: re-encodes a structurally-decoded value without a template.
fn encode_any<T: Clone, O: DynamicOps<T>>(value: &DynValue, ops: &O) -> Dynamic<T, O> {
    match value {
        DynValue::String(s) => Dynamic::new(ops.clone(), ops.create_string(s)),
        DynValue::Int(v) => Dynamic::new(ops.clone(), ops.create_int(*v)),
        DynValue::Long(v) => Dynamic::new(ops.clone(), ops.create_long(*v)),
        DynValue::Float(v) => Dynamic::new(ops.clone(), ops.create_float(*v)),
        DynValue::Double(v) => Dynamic::new(ops.clone(), ops.create_double(*v)),
        DynValue::Bool(v) => Dynamic::new(ops.clone(), ops.create_boolean(*v)),
        DynValue::Byte(v) => Dynamic::new(ops.clone(), ops.create_byte(*v)),
        DynValue::Short(v) => Dynamic::new(ops.clone(), ops.create_short(*v)),
        DynValue::List(items) => {
            let encoded = items.iter().map(|i| encode_any(i, ops).into_value()).collect();
            Dynamic::new(ops.clone(), ops.create_list(encoded))
        }
        DynValue::Record(fields) => {
            let mut d = Dynamic::new(ops.clone(), ops.empty_map());
            for (k, v) in fields {
                d = d.set(k, encode_any(v, ops));
            }
            d
        }
        DynValue::Tagged(tag, inner) => encode_any(inner, ops).set("__tag", Dynamic::new(ops.clone(), ops.create_string(tag))),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        dsl::{
            and,
            field,
            int_type,
            list,
            optional,
            remainder,
            string,
            tagged_choice,
        },
        ops::json::JsonOps,
    };

    fn record(fields: Vec<(&str, DynValue)>) -> DynValue {
        DynValue::Record(fields.into_iter().map(|(k, v)| (k.to_owned(), v)).collect())
    }

    #[test]
    fn round_trips_a_simple_product() {
        let template = and([field("name", string()), field("level", int_type())]);
        let family = TypeFamily::new();
        let codec = template.codec(&family);
        let ops = JsonOps;

        let value = record(vec![("name", DynValue::String("Steve".into())), ("level", DynValue::Int(3))]);
        let encoded = codec.encode_start(&ops, &value).value().unwrap();
        let Pair(decoded, _) = codec.decode(&encoded).value().unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn remainder_preserves_unknown_fields() {
        let template = and([field("name", string()), remainder()]);
        let family = TypeFamily::new();
        let codec = template.codec(&family);
        let ops = JsonOps;

        let raw = Dynamic::new(ops, ops.empty_map())
            .set("name", Dynamic::new(ops, ops.create_string("Steve")))
            .set("unknown_future_field", Dynamic::new(ops, ops.create_int(7)));

        let Pair(decoded, _) = codec.decode(&raw).value().unwrap();
        let re_encoded = codec.encode_start(&ops, &decoded).value().unwrap();
        assert!(re_encoded.has("unknown_future_field"));
        assert_eq!(re_encoded.get("unknown_future_field").as_int(), DataResult::Success(7));
    }

    #[test]
    fn missing_required_field_is_error() {
        let template = field("name", string());
        let family = TypeFamily::new();
        let codec = template.codec(&family);
        let ops = JsonOps;

        let empty = Dynamic::new(ops, ops.empty_map());
        assert!(Codec::<DynValue, serde_json::Value, JsonOps>::decode(&codec, &empty).is_error());
    }

    #[test]
    fn list_of_ints_round_trips() {
        let template = list(int_type());
        let family = TypeFamily::new();
        let codec = template.codec(&family);
        let ops = JsonOps;

        let value = DynValue::List(vec![DynValue::Int(1), DynValue::Int(2), DynValue::Int(3)]);
        let encoded = codec.encode_start(&ops, &value).value().unwrap();
        let Pair(decoded, _) = codec.decode(&encoded).value().unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn optional_field_absent_round_trips_to_empty() {
        let template = and([field("name", string()), optional("nickname", string())]);
        let family = TypeFamily::new();
        let codec = template.codec(&family);
        let ops = JsonOps;

        let value = record(vec![("name", DynValue::String("Steve".into()))]);
        let encoded = codec.encode_start(&ops, &value).value().unwrap();
        assert!(!encoded.has("nickname"));
        let Pair(decoded, _) = codec.decode(&encoded).value().unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn tagged_choice_inside_and_round_trips() {
        let template = and([
            field("name", string()),
            tagged_choice("kind", [("sword".to_owned(), field("damage", int_type())), ("shield".to_owned(), field("armor", int_type()))]),
        ]);
        let family = TypeFamily::new();
        let codec = template.codec(&family);
        let ops = JsonOps;

        let value = DynValue::Record(vec![
            ("name".to_owned(), DynValue::String("Steve".into())),
            ("kind".to_owned(), DynValue::Tagged("sword".to_owned(), Box::new(DynValue::Record(vec![("damage".to_owned(), DynValue::Int(5))])))),
        ]);

        let encoded = codec.encode_start(&ops, &value).value().unwrap();
        assert_eq!(encoded.get("kind").as_string().value().unwrap(), "sword");
        assert_eq!(encoded.get("damage").as_int().value().unwrap(), 5);

        let Pair(decoded, _) = codec.decode(&encoded).value().unwrap();
        assert_eq!(decoded, value);

        let re_encoded = codec.encode_start(&ops, &decoded).value().unwrap();
        assert_eq!(re_encoded.get("kind").as_string().value().unwrap(), "sword");
        assert_eq!(re_encoded.get("damage").as_int().value().unwrap(), 5);
    }
}
