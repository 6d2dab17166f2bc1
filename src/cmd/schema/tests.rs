use crate::cmd::test_support::{fixture_path, run_bendec, run_bendec_json, run_bendec_stdout};

#[test]
fn schema_json_lists_types_with_lengths() {
	let schema = fixture_path("animals.json");
	let json = run_bendec_json(&["schema", &schema, "--json"]);

	assert_eq!(json["compression"], "none");
	let types = json["types"].as_array().expect("types array");
	let animal = types.iter().find(|item| item["name"] == "Animal").expect("Animal listed");
	assert_eq!(animal["kind"], "union");
	assert_eq!(animal["length"]["header"], 2);
	assert_eq!(animal["length"]["min"], 11);
	assert_eq!(animal["length"]["max"], 16);

	let flags = types.iter().find(|item| item["name"] == "Bitflags").expect("Bitflags listed");
	assert_eq!(flags["kind"], "flags");
	assert_eq!(json["aliases"][0]["target"], "u64");
}

#[test]
fn schema_type_json_reports_field_offsets() {
	let schema = fixture_path("animals.json");
	let json = run_bendec_json(&["schema", &schema, "--type", "Zebra", "--json"]);

	let fields = json["fields"].as_array().expect("fields array");
	let offsets: Vec<_> = fields.iter().map(|item| item["offset"].as_u64().expect("offset")).collect();
	assert_eq!(offsets, [0, 5, 6]);
	assert_eq!(fields[2]["type"], "char");
	assert_eq!(fields[2]["count"], 8);
	assert_eq!(json["length"]["max"], 14);
}

#[test]
fn schema_type_text_lists_union_variants() {
	let schema = fixture_path("animals.json");
	let out = run_bendec_stdout(&["schema", &schema, "--type", "Animal2"]);

	assert!(out.contains("kind: union"));
	assert!(out.contains("discriminator: kind"));
	assert!(out.contains("Zebra2 tag=0x1 record=Zebra2 length=2"));
}

#[test]
fn unknown_type_fails_with_error_line() {
	let schema = fixture_path("animals.json");
	let output = run_bendec(&["schema", &schema, "--type", "Horse"]);

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).starts_with("error: unknown type: Horse"));
}
