//! vpnsslweb_portal_bookmarkgroup_bookmarks descriptor for FortiManager
//!
//! Auto-generated from FortiManager object schema: vpn ssl web portal bookmark-group bookmarks
//!
//! DO NOT EDIT MANUALLY - regenerate with fmg-codegen

use super::{FmgSchemaConfig, with_scope};
use crate::scope::PathParam;
use fmg_core::schema::{AttributeSchema, AttributeType, ResourceSchema, types};

const PARAMS: &[PathParam] = &[
    PathParam::new("device", "device_name"),
    PathParam::new("vdom", "device_vdom").with_default("root"),
    PathParam::new("portal", "portal"),
    PathParam::new("bookmark_group", "bookmark_group"),
];

/// Returns the schema config for vpnsslweb_portal_bookmarkgroup_bookmarks
pub fn vpnsslweb_portal_bookmarkgroup_bookmarks_config() -> FmgSchemaConfig {
    FmgSchemaConfig {
        url: "/pm/config/device/{device}/vdom/{vdom}/vpn/ssl/web/portal/{portal}/bookmark-group/{bookmark_group}/bookmarks",
        mkey: "name",
        server_assigned_key: false,
        params: PARAMS,
        schema: with_scope(
            ResourceSchema::new("vpnsslweb_portal_bookmarkgroup_bookmarks")
                .with_description("Bookmark table.")
                .attribute(
                    AttributeSchema::new(
                        "apptype",
                        types::options(&["web", "telnet", "ssh", "ftp", "smb", "vnc", "rdp", "sftp"]),
                    )
                    .with_description("Application type.")
                    .with_provider_name("apptype"),
                )
                .attribute(
                    AttributeSchema::new("description", AttributeType::String)
                        .with_description("Description.")
                        .with_provider_name("description"),
                )
                .attribute(
                    AttributeSchema::new("folder", AttributeType::String)
                        .with_description("Network shared file folder parameter.")
                        .with_provider_name("folder"),
                )
                .attribute(
                    AttributeSchema::new("host", AttributeType::String)
                        .with_description("Host name/IP parameter.")
                        .with_provider_name("host"),
                )
                .attribute(
                    AttributeSchema::new("listening_port", types::port())
                        .with_description("Listening port (0 - 65535).")
                        .with_provider_name("listening-port"),
                )
                .attribute(
                    AttributeSchema::new("name", AttributeType::String)
                        .required()
                        .with_description("Bookmark name.")
                        .with_provider_name("name"),
                )
                .attribute(
                    AttributeSchema::new("port", types::port())
                        .with_description("Remote port.")
                        .with_provider_name("port"),
                )
                .attribute(
                    AttributeSchema::new("sso", types::options(&["disable", "auto"]))
                        .with_description("Single sign-on.")
                        .with_provider_name("sso"),
                )
                .attribute(
                    AttributeSchema::new("url", AttributeType::String)
                        .with_description("URL parameter.")
                        .with_provider_name("url"),
                ),
            PARAMS,
        ),
    }
}
