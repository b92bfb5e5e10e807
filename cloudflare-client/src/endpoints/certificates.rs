//! Custom SSL and Keyless SSL certificates.

use super::{Endpoint, id, object_body, sorted_listing, zone_item_params, zone_params};
use crate::validator::{FieldRule, ObjectSchema};

fn bundle_method() -> FieldRule {
    FieldRule::string().valid(["ubiquitous", "optimal", "force"])
}

fn custom_certificate() -> FieldRule {
    object_body(
        ObjectSchema::new()
            .field("certificate", FieldRule::string().required())
            .field("private_key", FieldRule::string().required())
            .field("bundle_method", bundle_method()),
    )
}

fn keyless_server() -> ObjectSchema {
    ObjectSchema::new()
        .field("host", FieldRule::string().max_len(253).required())
        .field("port", FieldRule::number().max(65535.0).required())
        .field("name", FieldRule::string().max_len(180).required())
}

fn status_listing() -> ObjectSchema {
    sorted_listing().field(
        "status",
        FieldRule::string().valid(["active", "expired", "deleted"]),
    )
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::post(
            "zone_custom_certificate_new",
            "zones/:zone_identifier/custom_certificates",
        )
        .params(zone_params())
        .body(custom_certificate()),
        Endpoint::get(
            "zone_custom_certificate_get_all",
            "zones/:zone_identifier/custom_certificates",
        )
        .params(zone_params())
        .query(status_listing().field(
            "order",
            FieldRule::string().valid(["status", "issuer", "priority", "expires_on"]),
        )),
        Endpoint::get(
            "zone_custom_certificate_get",
            "zones/:zone_identifier/custom_certificates/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::patch(
            "zone_custom_certificate_update",
            "zones/:zone_identifier/custom_certificates/:identifier",
        )
        .params(zone_item_params())
        .body(custom_certificate()),
        Endpoint::put(
            "zone_custom_certificate_priority_update",
            "zones/:zone_identifier/custom_certificates/prioritize",
        )
        .params(zone_params())
        .body(object_body(
            ObjectSchema::new().field(
                "certificates",
                FieldRule::array()
                    .items(FieldRule::object(
                        ObjectSchema::new()
                            .field("ids", id())
                            .field("priority", FieldRule::number().required()),
                    ))
                    .required(),
            ),
        )),
        Endpoint::delete(
            "zone_custom_certificate_destroy",
            "zones/:zone_identifier/custom_certificates/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::post(
            "zone_keyless_certificate_new",
            "zones/:zone_identifier/keyless_certificates",
        )
        .params(zone_params())
        .body(object_body(
            keyless_server()
                .field("certificate", FieldRule::string().required())
                .field("bundle_method", bundle_method()),
        )),
        Endpoint::get(
            "zone_keyless_certificate_get_all",
            "zones/:zone_identifier/keyless_certificates",
        )
        .params(zone_params())
        .query(status_listing().field("order", FieldRule::string().valid(["status"]))),
        Endpoint::get(
            "zone_keyless_certificate_get",
            "zones/:zone_identifier/keyless_certificates/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::patch(
            "zone_keyless_certificate_update",
            "zones/:zone_identifier/keyless_certificates/:identifier",
        )
        .params(zone_item_params())
        .body(object_body(
            keyless_server().field("enabled", FieldRule::boolean()),
        )),
        Endpoint::delete(
            "zone_keyless_certificate_destroy",
            "zones/:zone_identifier/keyless_certificates/:identifier",
        )
        .params(zone_item_params()),
    ]
}
