//! FortiManager Object Schema to fmg Descriptor Code Generator
//!
//! This tool generates the Rust descriptor modules under
//! fmg-provider/src/schemas/generated from FortiManager object schemas.
//!
//! Usage:
//!   # Generate from file
//!   fmg-codegen --file firewall_address.json \
//!     --output fmg-provider/src/schemas/generated/firewall_address.rs
//!
//!   # Generate from stdin
//!   cat firewall_address.json | fmg-codegen
//!
//! Object schema format:
//!
//! ```json
//! {
//!   "name": "firewall address",
//!   "description": "Configure IPv4 addresses.",
//!   "url": "/pm/config/device/{device}/vdom/{vdom}/firewall/address",
//!   "mkey": "name",
//!   "attributes": {
//!     "name": { "type": "string", "required": true, "help": "Address name." },
//!     "subnet": { "type": "ipv4-mask", "help": "IP address and subnet mask of address." }
//!   }
//! }
//! ```

use anyhow::{Context, Result, bail};
use clap::Parser;
use heck::{ToSnakeCase, ToUpperCamelCase};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{self, Read};

/// rustfmt line width the generated code is laid out for
const MAX_WIDTH: usize = 100;

#[derive(Parser, Debug)]
#[command(name = "fmg-codegen")]
#[command(about = "Generate fmg resource descriptors from FortiManager object schemas")]
struct Args {
    /// Input file (reads from stdin if not specified)
    #[arg(long)]
    file: Option<String>,

    /// Output file (writes to stdout if not specified)
    #[arg(long, short)]
    output: Option<String>,
}

/// FortiManager object schema
#[derive(Debug, Deserialize)]
struct ObjectSchema {
    /// Object path words (e.g., "firewall address")
    name: String,
    /// Overrides the resource type derived from `name`
    #[serde(default)]
    resource_type: Option<String>,
    description: Option<String>,
    url: String,
    mkey: String,
    #[serde(default)]
    server_assigned_key: bool,
    /// Derived from the URL placeholders when absent
    #[serde(default)]
    params: Option<Vec<ParamDef>>,
    attributes: BTreeMap<String, FieldDef>,
}

#[derive(Debug, Deserialize)]
struct ParamDef {
    name: String,
    attribute: Option<String>,
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FieldDef {
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default)]
    multi: bool,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    computed: bool,
    range: Option<[i64; 2]>,
    help: Option<String>,
    /// Sub-fields of a `table`
    #[serde(default)]
    attributes: BTreeMap<String, FieldDef>,
}

impl FieldDef {
    fn is_computed(&self) -> bool {
        self.computed || self.field_type == "uuid"
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Read schema JSON
    let schema_json = if let Some(file_path) = &args.file {
        std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read file: {}", file_path))?
    } else {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read from stdin")?;
        buffer
    };

    let schema: ObjectSchema =
        serde_json::from_str(&schema_json).context("Failed to parse FortiManager object schema")?;

    let code = generate_descriptor_code(&schema)?;

    if let Some(output_path) = &args.output {
        std::fs::write(output_path, &code)
            .with_context(|| format!("Failed to write to: {}", output_path))?;
        eprintln!("Generated: {}", output_path);
    } else {
        print!("{}", code);
    }

    Ok(())
}

/// "firewall address" -> firewall_address, "router access-list" -> router_accesslist
fn resource_type_name(schema: &ObjectSchema) -> String {
    if let Some(name) = &schema.resource_type {
        return name.clone();
    }
    schema
        .name
        .split_whitespace()
        .map(|word| word.replace('-', ""))
        .collect::<Vec<_>>()
        .join("_")
}

fn url_placeholders(url: &str) -> Vec<&str> {
    url.split('{')
        .skip(1)
        .filter_map(|rest| rest.split_once('}').map(|(name, _)| name))
        .collect()
}

/// (placeholder, attribute, default)
fn resolve_params(schema: &ObjectSchema) -> Result<Vec<(String, String, Option<String>)>> {
    let placeholders = url_placeholders(&schema.url);

    let params: Vec<_> = match &schema.params {
        Some(params) => params
            .iter()
            .map(|p| {
                let attribute = p.attribute.clone().unwrap_or_else(|| p.name.to_snake_case());
                (p.name.clone(), attribute, p.default.clone())
            })
            .collect(),
        None => placeholders
            .iter()
            .map(|name| match *name {
                "device" => ("device".to_string(), "device_name".to_string(), None),
                "vdom" => (
                    "vdom".to_string(),
                    "device_vdom".to_string(),
                    Some("root".to_string()),
                ),
                other => (other.to_string(), other.to_snake_case(), None),
            })
            .collect(),
    };

    if params.len() != placeholders.len() {
        bail!(
            "URL {} has {} placeholders but {} params are declared",
            schema.url,
            placeholders.len(),
            params.len()
        );
    }
    for (placeholder, attribute, _) in &params {
        if !placeholders.contains(&placeholder.as_str()) {
            bail!("Param '{}' is not a placeholder of {}", placeholder, schema.url);
        }
        if schema
            .attributes
            .keys()
            .any(|name| name.to_snake_case() == *attribute)
        {
            bail!("Param attribute '{}' collides with an object attribute", attribute);
        }
    }

    Ok(params)
}

fn generate_descriptor_code(schema: &ObjectSchema) -> Result<String> {
    let resource = resource_type_name(schema);
    if !schema.attributes.contains_key(&schema.mkey) {
        bail!("mkey '{}' is not an attribute of {}", schema.mkey, schema.name);
    }
    let params = resolve_params(schema)?;

    // Attributes sorted by local name
    let mut fields: Vec<(String, &String, &FieldDef)> = schema
        .attributes
        .iter()
        .map(|(remote, def)| (remote.to_snake_case(), remote, def))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut blocks = Vec::with_capacity(fields.len());
    let mut needs_types = false;
    for (local, remote, def) in &fields {
        let is_mkey = **remote == schema.mkey;
        let block = attribute_block(local, remote, def, is_mkey, schema.server_assigned_key)
            .with_context(|| format!("Attribute '{}'", remote))?;
        needs_types |= block.contains("types::");
        blocks.push(block);
    }

    let mut code = String::new();

    // Header with conditional imports
    let types_import = if needs_types { ", types" } else { "" };
    code.push_str(&format!(
        r#"//! {} descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: {}
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{{FmgSchemaConfig, with_scope}};
use crate::scope::PathParam;
use fmg_core::schema::{{AttributeSchema, AttributeType, ResourceSchema{}}};

"#,
        resource, schema.name, types_import
    ));

    code.push_str(&params_code(&params));
    code.push('\n');

    code.push_str(&format!(
        r#"/// Returns the schema config for {resource}
pub fn {resource}_config() -> FmgSchemaConfig {{
    FmgSchemaConfig {{
        url: "{url}",
        mkey: "{mkey}",
        server_assigned_key: {server_assigned},
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("{resource}")
"#,
        resource = resource,
        url = schema.url,
        mkey = schema.mkey,
        server_assigned = schema.server_assigned_key,
    ));

    if let Some(desc) = &schema.description {
        code.push_str(&format!(
            "                .with_description(\"{}\")\n",
            escape_description(desc, 200)
        ));
    }

    code.push_str(&blocks.join("\n"));
    code.push_str(",\n            PARAMS,\n        ),\n    }\n}\n");

    Ok(code)
}

fn params_code(params: &[(String, String, Option<String>)]) -> String {
    let entries: Vec<String> = params
        .iter()
        .map(|(placeholder, attribute, default)| {
            let mut entry = format!("PathParam::new(\"{}\", \"{}\")", placeholder, attribute);
            if let Some(default) = default {
                entry.push_str(&format!(".with_default(\"{}\")", default));
            }
            entry
        })
        .collect();

    let single = format!("const PARAMS: &[PathParam] = &[{}];\n", entries.join(", "));
    if entries.len() <= 1 && single.len() <= MAX_WIDTH + 1 {
        return single;
    }

    let mut code = String::from("const PARAMS: &[PathParam] = &[\n");
    for entry in entries {
        code.push_str(&format!("    {},\n", entry));
    }
    code.push_str("];\n");
    code
}

/// One `.attribute(...)` call, without the trailing newline
fn attribute_block(
    local: &str,
    remote: &str,
    def: &FieldDef,
    is_mkey: bool,
    server_assigned_key: bool,
) -> Result<String> {
    let chain = modifier_chain(remote, def, is_mkey && !server_assigned_key);

    if def.field_type == "table" {
        let struct_type = table_type(local, def)?;
        let mut code = format!(
            "                .attribute(\n                    AttributeSchema::new(\n                        \"{}\",\n{}\n                    )\n",
            local, struct_type
        );
        for modifier in &chain {
            code.push_str(&format!("                    {}\n", modifier));
        }
        trim_chain_end(&mut code);
        code.push_str(",\n                )");
        return Ok(code);
    }

    let attr_type = scalar_type(def, is_mkey)?;
    let single = format!("AttributeSchema::new(\"{}\", {})", local, attr_type);

    let mut code = String::from("                .attribute(\n");
    if 20 + single.len() <= MAX_WIDTH {
        code.push_str(&format!("                    {}\n", single));
        for modifier in &chain {
            code.push_str(&format!("                        {}\n", modifier));
        }
    } else {
        code.push_str(&format!(
            "                    AttributeSchema::new(\n                        \"{}\",\n                        {},\n                    )\n",
            local, attr_type
        ));
        for modifier in &chain {
            code.push_str(&format!("                    {}\n", modifier));
        }
    }
    trim_chain_end(&mut code);
    code.push_str(",\n                )");
    Ok(code)
}

fn trim_chain_end(code: &mut String) {
    if code.ends_with('\n') {
        code.pop();
    }
}

fn modifier_chain(remote: &str, def: &FieldDef, required: bool) -> Vec<String> {
    let mut chain = Vec::new();
    if required || (def.required && !def.is_computed()) {
        chain.push(".required()".to_string());
    }
    if def.is_computed() {
        chain.push(".computed()".to_string());
    }
    if let Some(help) = &def.help {
        chain.push(format!(
            ".with_description(\"{}\")",
            escape_description(help, 200)
        ));
    }
    chain.push(format!(".with_provider_name(\"{}\")", remote));
    chain
}

/// `List(Struct)` type of a table, indented for the multi-line attribute form
fn table_type(local: &str, def: &FieldDef) -> Result<String> {
    if def.attributes.is_empty() {
        bail!("table has no attributes");
    }

    let mut fields: Vec<(String, &String, &FieldDef)> = def
        .attributes
        .iter()
        .map(|(remote, sub)| (remote.to_snake_case(), remote, sub))
        .collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    let mut code = format!(
        "                        AttributeType::List(Box::new(AttributeType::Struct {{\n                            name: \"{}\".to_string(),\n                            fields: vec![\n",
        local.to_upper_camel_case()
    );
    for (sub_local, sub_remote, sub) in fields {
        if sub.field_type == "table" {
            bail!("nested table '{}' is not supported", sub_remote);
        }
        let attr_type = scalar_type(sub, false)?;
        code.push_str(&format!(
            "                                AttributeSchema::new(\"{}\", {})\n",
            sub_local, attr_type
        ));
        let chain = modifier_chain(sub_remote, sub, false);
        let last = chain.len() - 1;
        for (i, modifier) in chain.iter().enumerate() {
            let end = if i == last { "," } else { "" };
            code.push_str(&format!(
                "                                    {}{}\n",
                modifier, end
            ));
        }
    }
    code.push_str("                            ],\n                        })),");
    Ok(code)
}

fn scalar_type(def: &FieldDef, is_mkey: bool) -> Result<String> {
    let base = match def.field_type.as_str() {
        "integer" => {
            if is_mkey {
                "types::positive_int()".to_string()
            } else {
                match def.range {
                    Some([0, 65535]) => "types::port()".to_string(),
                    Some([min, max]) => format!("types::int_range({}, {})", min, max),
                    None => "AttributeType::Int".to_string(),
                }
            }
        }
        "option" => {
            if def.options.is_empty() {
                bail!("option type without options");
            }
            if is_toggle(&def.options) {
                "types::toggle()".to_string()
            } else {
                let values: Vec<String> = def.options.iter().map(|v| format!("\"{}\"", v)).collect();
                format!("types::options(&[{}])", values.join(", "))
            }
        }
        "ipv4-address" | "ipv4-address-any" => "types::ipv4()".to_string(),
        "ipv4-mask" | "ipv4-classnet" | "ipv4-classnet-any" | "ipv4-prefix" => {
            "types::ipv4_mask()".to_string()
        }
        "table" => bail!("table is not a scalar type"),
        // string, password, uuid, datetime, ...
        _ => "AttributeType::String".to_string(),
    };

    if !def.multi {
        return Ok(base);
    }
    if base == "AttributeType::String" {
        Ok("types::string_list()".to_string())
    } else {
        Ok(format!("AttributeType::List(Box::new({}))", base))
    }
}

fn is_toggle(options: &[String]) -> bool {
    options.len() == 2
        && options.iter().any(|o| o == "enable")
        && options.iter().any(|o| o == "disable")
}

fn escape_description(desc: &str, max_chars: usize) -> String {
    let escaped = desc
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', " ")
        .replace("  ", " ");
    if escaped.chars().count() > max_chars {
        let truncated: String = escaped.chars().take(max_chars).collect();
        // Never leave a dangling escape
        format!("{}...", truncated.trim_end_matches('\\'))
    } else {
        escaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ObjectSchema {
        serde_json::from_str(json).unwrap()
    }

    fn address_schema() -> ObjectSchema {
        parse(
            r#"{
                "name": "firewall address",
                "description": "Configure IPv4 addresses.",
                "url": "/pm/config/device/{device}/vdom/{vdom}/firewall/address",
                "mkey": "name",
                "attributes": {
                    "name": {"type": "string", "required": true, "help": "Address name."},
                    "subnet": {"type": "ipv4-mask", "help": "IP address and subnet mask of address."},
                    "associated-interface": {"type": "string", "multi": true, "help": "Network interface associated with address."},
                    "uuid": {"type": "uuid", "help": "Universally Unique Identifier."},
                    "visibility": {"type": "option", "options": ["disable", "enable"]}
                }
            }"#,
        )
    }

    #[test]
    fn generates_simple_module() {
        let code = generate_descriptor_code(&address_schema()).unwrap();

        assert!(code.starts_with("//! firewall_address descriptor for FortiManager\n"));
        assert!(code.contains(
            "use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};"
        ));
        assert!(code.contains(
            "const PARAMS: &[PathParam] = &[\n    PathParam::new(\"device\", \"device_name\"),\n    PathParam::new(\"vdom\", \"device_vdom\").with_default(\"root\"),\n];"
        ));
        assert!(code.contains("pub fn firewall_address_config() -> FmgSchemaConfig {"));
        assert!(code.contains("        mkey: \"name\",\n        server_assigned_key: false,"));
        assert!(code.contains(
            "                .attribute(\n                    AttributeSchema::new(\"name\", AttributeType::String)\n                        .required()\n                        .with_description(\"Address name.\")\n                        .with_provider_name(\"name\"),\n                )"
        ));
        assert!(code.contains(
            "AttributeSchema::new(\"associated_interface\", types::string_list())"
        ));
        assert!(code.contains(
            "AttributeSchema::new(\"uuid\", AttributeType::String)\n                        .computed()"
        ));
        assert!(code.ends_with(
            "                        .with_provider_name(\"visibility\"),\n                ),\n            PARAMS,\n        ),\n    }\n}\n"
        ));
    }

    #[test]
    fn attributes_are_sorted_by_local_name() {
        let code = generate_descriptor_code(&address_schema()).unwrap();
        let positions: Vec<usize> = ["associated_interface", "name", "subnet", "uuid", "visibility"]
            .iter()
            .map(|local| code.find(&format!("AttributeSchema::new(\"{}\"", local)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn long_option_lists_use_multiline_form() {
        let schema = parse(
            r#"{
                "name": "firewall address",
                "url": "/pm/config/device/{device}/vdom/{vdom}/firewall/address",
                "mkey": "name",
                "attributes": {
                    "name": {"type": "string"},
                    "type": {
                        "type": "option",
                        "options": ["ipmask", "iprange", "fqdn", "geography", "wildcard", "dynamic", "interface-subnet"],
                        "help": "Type of address."
                    }
                }
            }"#,
        );
        let code = generate_descriptor_code(&schema).unwrap();
        assert!(code.contains(
            "                    AttributeSchema::new(\n                        \"type\",\n                        types::options(&[\"ipmask\", \"iprange\", \"fqdn\", \"geography\", \"wildcard\", \"dynamic\", \"interface-subnet\"]),\n                    )\n                    .with_description(\"Type of address.\")\n                    .with_provider_name(\"type\"),\n                )"
        ));
    }

    #[test]
    fn server_assigned_integer_key() {
        let schema = parse(
            r#"{
                "name": "router static",
                "url": "/pm/config/device/{device}/vdom/{vdom}/router/static",
                "mkey": "seq-num",
                "server_assigned_key": true,
                "attributes": {
                    "seq-num": {"type": "integer", "help": "Sequence number."},
                    "distance": {"type": "integer", "range": [1, 255]},
                    "priority": {"type": "integer", "range": [0, 4294967295]},
                    "port": {"type": "integer", "range": [0, 65535]},
                    "weight": {"type": "integer"}
                }
            }"#,
        );
        let code = generate_descriptor_code(&schema).unwrap();
        assert!(code.contains("server_assigned_key: true,"));
        assert!(code.contains(
            "AttributeSchema::new(\"seq_num\", types::positive_int())\n                        .with_description(\"Sequence number.\")\n                        .with_provider_name(\"seq-num\"),"
        ));
        assert!(code.contains("AttributeSchema::new(\"distance\", types::int_range(1, 255))"));
        assert!(code.contains("AttributeSchema::new(\"priority\", types::int_range(0, 4294967295))"));
        assert!(code.contains("AttributeSchema::new(\"port\", types::port())"));
        assert!(code.contains("AttributeSchema::new(\"weight\", AttributeType::Int)"));
    }

    #[test]
    fn table_becomes_list_of_struct() {
        let schema = parse(
            r#"{
                "name": "router access-list",
                "url": "/pm/config/device/{device}/vdom/{vdom}/router/access-list",
                "mkey": "name",
                "attributes": {
                    "name": {"type": "string", "required": true},
                    "rule": {
                        "type": "table",
                        "help": "Rule.",
                        "attributes": {
                            "id": {"type": "integer", "help": "Rule ID."},
                            "action": {"type": "option", "options": ["permit", "deny"]}
                        }
                    }
                }
            }"#,
        );
        let code = generate_descriptor_code(&schema).unwrap();
        assert!(code.contains("pub fn router_accesslist_config()"));
        assert!(code.contains(
            "                        AttributeType::List(Box::new(AttributeType::Struct {\n                            name: \"Rule\".to_string(),\n                            fields: vec![\n                                AttributeSchema::new(\"action\", types::options(&[\"permit\", \"deny\"]))\n                                    .with_provider_name(\"action\"),\n                                AttributeSchema::new(\"id\", AttributeType::Int)\n                                    .with_description(\"Rule ID.\")\n                                    .with_provider_name(\"id\"),\n                            ],\n                        })),\n                    )\n                    .with_description(\"Rule.\")\n                    .with_provider_name(\"rule\"),\n                )"
        ));
    }

    #[test]
    fn single_param_stays_on_one_line() {
        let schema = parse(
            r#"{
                "name": "system interface",
                "url": "/pm/config/device/{device}/global/system/interface",
                "mkey": "name",
                "attributes": {"name": {"type": "string", "required": true}}
            }"#,
        );
        let code = generate_descriptor_code(&schema).unwrap();
        assert!(code.contains("const PARAMS: &[PathParam] = &[PathParam::new(\"device\", \"device_name\")];\n"));
    }

    #[test]
    fn parent_placeholders_bind_to_same_named_attributes() {
        let schema = parse(
            r#"{
                "name": "vpn ssl web portal bookmark-group bookmarks",
                "resource_type": "vpnsslweb_portal_bookmarkgroup_bookmarks",
                "url": "/pm/config/device/{device}/vdom/{vdom}/vpn/ssl/web/portal/{portal}/bookmark-group/{bookmark_group}/bookmarks",
                "mkey": "name",
                "attributes": {"name": {"type": "string", "required": true}}
            }"#,
        );
        let code = generate_descriptor_code(&schema).unwrap();
        assert!(code.contains("pub fn vpnsslweb_portal_bookmarkgroup_bookmarks_config()"));
        assert!(code.contains("    PathParam::new(\"portal\", \"portal\"),\n"));
        assert!(code.contains("    PathParam::new(\"bookmark_group\", \"bookmark_group\"),\n"));
    }

    #[test]
    fn rejects_unknown_mkey() {
        let schema = parse(
            r#"{
                "name": "firewall address",
                "url": "/pm/config/device/{device}/vdom/{vdom}/firewall/address",
                "mkey": "id",
                "attributes": {"name": {"type": "string"}}
            }"#,
        );
        let err = generate_descriptor_code(&schema).unwrap_err();
        assert!(err.to_string().contains("mkey 'id'"));
    }

    #[test]
    fn rejects_params_not_in_url() {
        let schema = parse(
            r#"{
                "name": "system interface",
                "url": "/pm/config/device/{device}/global/system/interface",
                "mkey": "name",
                "params": [{"name": "device"}, {"name": "vdom", "default": "root"}],
                "attributes": {"name": {"type": "string"}}
            }"#,
        );
        assert!(generate_descriptor_code(&schema).is_err());
    }

    #[test]
    fn descriptions_are_escaped_and_truncated() {
        assert_eq!(
            escape_description("such as \"any\" or\nsubnets", 200),
            "such as \\\"any\\\" or subnets"
        );
        let long = "x".repeat(250);
        let escaped = escape_description(&long, 200);
        assert_eq!(escaped.len(), 203);
        assert!(escaped.ends_with("..."));
    }
}
