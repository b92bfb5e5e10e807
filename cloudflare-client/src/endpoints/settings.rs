//! Zone settings. Each setting has a getter and, except `advanced_ddos`, an
//! updater taking `{"value": ...}`.

use super::{Endpoint, listing, object_body, on_off, zone_params};
use crate::validator::{FieldRule, ObjectSchema};

const BROWSER_CACHE_TTLS: [i64; 26] = [
    30, 60, 300, 1200, 1800, 3600, 7200, 10_800, 14_400, 18_000, 28_800,
    43_200, 57_600, 72_000, 86_400, 172_800, 259_200, 345_600, 432_000, 691_200,
    1_382_400, 2_073_600, 2_678_400, 5_356_800, 16_070_400, 31_536_000,
];

const CHALLENGE_TTLS: [i64; 14] = [
    300, 900, 1800, 2700, 3600, 7200, 10_800, 14_400, 28_800, 57_600, 86_400,
    604_800, 2_592_000, 31_536_000,
];

macro_rules! setting_get {
    ($key:literal) => {
        Endpoint::get(
            concat!("zone_settings_", $key, "_get"),
            concat!("zones/:zone_identifier/settings/", $key),
        )
        .params(zone_params())
    };
}

macro_rules! setting_update {
    ($key:literal, $value:expr) => {
        Endpoint::patch(
            concat!("zone_settings_", $key, "_update"),
            concat!("zones/:zone_identifier/settings/", $key),
        )
        .params(zone_params())
        .body(object_body(ObjectSchema::new().field("value", $value)))
    };
}

fn choice<const N: usize>(values: [&str; N]) -> FieldRule {
    FieldRule::string().valid(values).required()
}

fn minify() -> FieldRule {
    FieldRule::object(
        ObjectSchema::new()
            .field("css", on_off())
            .field("html", on_off())
            .field("js", on_off())
            .min_keys(1),
    )
    .required()
}

fn mobile_redirect() -> FieldRule {
    FieldRule::object(
        ObjectSchema::new()
            .field("status", on_off().required())
            .field("mobile_subdomain", FieldRule::string().required())
            .field("strip_uri", FieldRule::boolean().required()),
    )
    .required()
}

fn security_header() -> FieldRule {
    let hsts = ObjectSchema::new()
        .field("preload", FieldRule::boolean().required())
        .field("enabled", FieldRule::boolean().required())
        .field("max_age", FieldRule::number().max(86_400.0).required())
        .field("include_subdomains", FieldRule::boolean().required())
        .field("nosniff", FieldRule::boolean().required());
    FieldRule::object(
        ObjectSchema::new().field("strict_transport_security", FieldRule::object(hsts).required()),
    )
    .required()
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::get("zone_settings_get_all", "zones/:zone_identifier/settings")
            .params(zone_params())
            .query(listing()),
        Endpoint::patch("zone_settings_update", "zones/:zone_identifier/settings")
            .params(zone_params())
            .body(object_body(
                ObjectSchema::new().field(
                    "items",
                    FieldRule::array()
                        .items(
                            FieldRule::object(
                                ObjectSchema::new()
                                    .field("id", FieldRule::string().required())
                                    .field("value", FieldRule::string().required()),
                            )
                            .required(),
                        )
                        .required(),
                ),
            )),
        setting_get!("advanced_ddos"),
        setting_get!("always_online"),
        setting_get!("browser_cache_ttl"),
        setting_get!("browser_check"),
        setting_get!("cache_level"),
        setting_get!("challenge_ttl"),
        setting_get!("development_mode"),
        setting_get!("email_obfuscation"),
        setting_get!("hotlink_protection"),
        setting_get!("ip_geolocation"),
        setting_get!("ipv6"),
        setting_get!("minify"),
        setting_get!("mobile_redirect"),
        setting_get!("mirage"),
        setting_get!("origin_error_page_pass_thru"),
        setting_get!("polish"),
        setting_get!("prefetch_preload"),
        setting_get!("response_buffering"),
        setting_get!("rocket_loader"),
        setting_get!("security_header"),
        setting_get!("security_level"),
        setting_get!("server_side_exclude"),
        setting_get!("sort_query_string_for_cache"),
        setting_get!("ssl"),
        setting_get!("tls_client_auth"),
        setting_get!("true_client_ip_header"),
        setting_get!("tls_1_2_only"),
        setting_get!("waf"),
        setting_update!("always_online", on_off().required()),
        setting_update!(
            "browser_cache_ttl",
            FieldRule::number().valid_numbers(BROWSER_CACHE_TTLS).required()
        ),
        setting_update!("browser_check", on_off().required()),
        setting_update!("cache_level", choice(["aggressive", "basic", "simplified"])),
        setting_update!(
            "challenge_ttl",
            FieldRule::number().valid_numbers(CHALLENGE_TTLS).required()
        ),
        setting_update!("development_mode", on_off().required()),
        setting_update!("email_obfuscation", on_off().required()),
        setting_update!("origin_error_page_pass_thru", on_off().required()),
        setting_update!("hotlink_protection", on_off().required()),
        setting_update!("ip_geolocation", on_off().required()),
        setting_update!("ipv6", on_off().required()),
        setting_update!("minify", minify()),
        setting_update!("mobile_redirect", mobile_redirect()),
        setting_update!("mirage", on_off().required()),
        setting_update!("polish", choice(["off", "lossless", "lossy"])),
        setting_update!("prefetch_preload", on_off().required()),
        setting_update!("response_buffering", on_off().required()),
        setting_update!("rocket_loader", choice(["on", "off", "manual"])),
        setting_update!("security_header", security_header()),
        setting_update!(
            "security_level",
            choice(["essentially_off", "low", "medium", "high", "under_attack"])
        ),
        setting_update!("tls_client_auth", on_off()),
        setting_update!("true_client_ip_header", on_off()),
        setting_update!("tls_1_2_only", on_off()),
        setting_update!("waf", on_off()),
        setting_update!("server_side_exclude", on_off().required()),
        setting_update!("sort_query_string_for_cache", on_off().required()),
        setting_update!("ssl", choice(["off", "flexible", "full", "full_strict"])),
    ]
}
