use std::path::PathBuf;

use bendec::codec::{ByteLength, Result, Schema, SchemaFile, TypeDecl, TypeDef, TypeKind};

use crate::cmd::util::emit_json;

#[derive(clap::Args)]
pub struct Args {
	pub schema: PathBuf,
	#[arg(long = "type")]
	pub type_name: Option<String>,
	#[arg(long)]
	pub json: bool,
}

/// Print the resolved type table, or the layout of one type.
pub fn run(args: Args) -> Result<()> {
	let Args { schema, type_name, json } = args;

	let file = SchemaFile::open(&schema)?;
	let aliases: Vec<_> = file
		.decls
		.iter()
		.filter_map(|decl| match decl {
			TypeDecl::Alias { name, alias } => Some(AliasJson {
				name: name.clone(),
				target: file.schema.get(file.schema.type_id(alias).ok()?).name.to_string(),
			}),
			_ => None,
		})
		.collect();

	if let Some(name) = type_name {
		let id = file.schema.type_id(&name)?;
		let layout = layout_json(&file.schema, file.schema.get(id), file.schema.byte_length(id));
		if json {
			return emit_json(&layout);
		}
		print_layout(&layout);
		return Ok(());
	}

	let types: Vec<_> = file
		.schema
		.types()
		.map(|(id, item)| TypeJson {
			name: item.name.to_string(),
			kind: item.kind.label(),
			length: length_json(file.schema.byte_length(id)),
		})
		.collect();

	if json {
		return emit_json(&SchemaJson {
			path: schema.display().to_string(),
			compression: file.compression.as_str(),
			types,
			aliases,
		});
	}

	println!("path: {}", schema.display());
	println!("compression: {}", file.compression.as_str());
	println!("types: {}", types.len());
	for item in &types {
		println!("  {} {} {}", item.name, item.kind, length_label(&item.length));
	}
	if !aliases.is_empty() {
		println!("aliases:");
		for item in &aliases {
			println!("  {} -> {}", item.name, item.target);
		}
	}
	Ok(())
}

fn layout_json(schema: &Schema, def: &TypeDef, length: ByteLength) -> LayoutJson {
	let mut out = LayoutJson {
		name: def.name.to_string(),
		kind: def.kind.label(),
		length: length_json(length),
		underlying: None,
		discriminant: None,
		discriminator: None,
		fields: Vec::new(),
		constants: Vec::new(),
		variants: Vec::new(),
	};

	match &def.kind {
		TypeKind::Primitive(prim) => out.underlying = Some(prim.label().to_owned()),
		TypeKind::Enum(item) => {
			out.underlying = Some(format!("u{}", item.underlying.width * 8));
			out.constants = item
				.variants
				.iter()
				.map(|variant| ConstantJson {
					name: variant.name.to_string(),
					value: variant.value,
				})
				.collect();
		}
		TypeKind::Record(item) => {
			out.fields = item
				.fields
				.iter()
				.map(|field| FieldJson {
					name: field.name.to_string(),
					ty: schema.get(field.ty).name.to_string(),
					count: field.count,
					offset: field.offset,
					length: field.byte_len,
				})
				.collect();
		}
		TypeKind::Union(item) => {
			out.discriminant = Some(schema.get(item.discriminant).name.to_string());
			out.discriminator = Some(item.discriminator.label());
			out.variants = item
				.variants
				.iter()
				.map(|variant| VariantJson {
					name: variant.name.to_string(),
					tag: variant.tag,
					record: schema.get(variant.record).name.to_string(),
					length: item.header_len + variant.byte_len,
				})
				.collect();
		}
	}
	out
}

fn print_layout(layout: &LayoutJson) {
	println!("type: {}", layout.name);
	println!("kind: {}", layout.kind);
	println!("length: {}", length_label(&layout.length));
	if let Some(underlying) = &layout.underlying {
		println!("underlying: {underlying}");
	}
	if let Some(discriminant) = &layout.discriminant {
		println!("discriminant: {discriminant}");
	}
	if let Some(discriminator) = &layout.discriminator {
		println!("discriminator: {discriminator}");
	}
	for field in &layout.fields {
		let ty = match field.count {
			Some(count) => format!("{}[{count}]", field.ty),
			None => field.ty.clone(),
		};
		println!("  +{:<4} {:>4}  {} {}", field.offset, field.length, ty, field.name);
	}
	for constant in &layout.constants {
		println!("  {} = {:#x}", constant.name, constant.value);
	}
	for variant in &layout.variants {
		println!("  {} tag={:#x} record={} length={}", variant.name, variant.tag, variant.record, variant.length);
	}
}

fn length_json(length: ByteLength) -> LengthJson {
	match length {
		ByteLength::Fixed(len) => LengthJson {
			header: None,
			min: len,
			max: len,
		},
		ByteLength::PerVariant { header, min, max } => LengthJson { header: Some(header), min, max },
	}
}

fn length_label(length: &LengthJson) -> String {
	if length.min == length.max {
		return length.max.to_string();
	}
	format!("{}..={}", length.min, length.max)
}

#[derive(serde::Serialize)]
struct SchemaJson {
	path: String,
	compression: &'static str,
	types: Vec<TypeJson>,
	aliases: Vec<AliasJson>,
}

#[derive(serde::Serialize)]
struct TypeJson {
	name: String,
	kind: &'static str,
	length: LengthJson,
}

#[derive(serde::Serialize)]
struct AliasJson {
	name: String,
	target: String,
}

#[derive(serde::Serialize)]
struct LengthJson {
	#[serde(skip_serializing_if = "Option::is_none")]
	header: Option<usize>,
	min: usize,
	max: usize,
}

#[derive(serde::Serialize)]
struct LayoutJson {
	name: String,
	kind: &'static str,
	length: LengthJson,
	#[serde(skip_serializing_if = "Option::is_none")]
	underlying: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	discriminant: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	discriminator: Option<String>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	fields: Vec<FieldJson>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	constants: Vec<ConstantJson>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	variants: Vec<VariantJson>,
}

#[derive(serde::Serialize)]
struct FieldJson {
	name: String,
	#[serde(rename = "type")]
	ty: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	count: Option<usize>,
	offset: usize,
	length: usize,
}

#[derive(serde::Serialize)]
struct ConstantJson {
	name: String,
	value: u64,
}

#[derive(serde::Serialize)]
struct VariantJson {
	name: String,
	tag: u64,
	record: String,
	length: usize,
}

#[cfg(test)]
mod tests;
