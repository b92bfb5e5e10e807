//! DNS records of a zone.

use super::{Endpoint, object_body, sorted_listing, zone_item_params, zone_params};
use crate::validator::{FieldRule, ObjectSchema};

/// Record types accepted by the record endpoints.
const RECORD_TYPES: [&str; 9] = ["A", "AAAA", "CNAME", "TXT", "SRV", "LOC", "MX", "NS", "SPF"];

const MAX_NAME_LEN: usize = 255;
const MAX_TTL: f64 = 2_147_483_647.0;
const MAX_PRIORITY: f64 = 65535.0;

fn record_type() -> FieldRule {
    FieldRule::string().valid(RECORD_TYPES)
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::get("zone_dns_record_get_all", "zones/:zone_identifier/dns_records")
            .params(zone_params())
            .query(
                sorted_listing()
                    .field("type", record_type())
                    .field("name", FieldRule::string().max_len(MAX_NAME_LEN))
                    .field("content", FieldRule::string())
                    .field(
                        "order",
                        FieldRule::string().valid(["type", "name", "content", "ttl", "proxied"]),
                    ),
            ),
        Endpoint::post("zone_dns_record_new", "zones/:zone_identifier/dns_records")
            .params(zone_params())
            .body(object_body(
                ObjectSchema::new()
                    .field("type", record_type().required())
                    .field("name", FieldRule::string().max_len(MAX_NAME_LEN).required())
                    .field("content", FieldRule::string().required())
                    .field("ttl", FieldRule::number().max(MAX_TTL))
                    .field("proxied", FieldRule::boolean())
                    .field("priority", FieldRule::number().max(MAX_PRIORITY)),
            )),
        Endpoint::get(
            "zone_dns_record_get",
            "zones/:zone_identifier/dns_records/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::patch(
            "zone_dns_record_update",
            "zones/:zone_identifier/dns_records/:identifier",
        )
        .params(zone_item_params())
        .body(object_body(
            ObjectSchema::new()
                .field("type", record_type())
                .field("name", FieldRule::string().max_len(MAX_NAME_LEN))
                .field("content", FieldRule::string())
                .field("ttl", FieldRule::number().max(MAX_TTL))
                .field("proxied", FieldRule::boolean())
                .min_keys(1),
        )),
        Endpoint::delete(
            "zone_dns_record_destroy",
            "zones/:zone_identifier/dns_records/:identifier",
        )
        .params(zone_item_params()),
    ]
}
