use super::{Endpoint, object_body, sorted_listing, zone_item_params, zone_params};
use crate::validator::{FieldRule, ObjectSchema};

fn targets() -> FieldRule {
    FieldRule::array().items(FieldRule::object(
        ObjectSchema::new()
            .field("target", FieldRule::string().valid(["url"]).required())
            .field(
                "constraint",
                FieldRule::object(
                    ObjectSchema::new()
                        .field("operator", FieldRule::string().valid(["matches"]).required())
                        .field("value", FieldRule::string().required()),
                ),
            ),
    ))
}

fn actions() -> FieldRule {
    FieldRule::array().items(FieldRule::object(
        ObjectSchema::new()
            .field("id", FieldRule::string())
            .field("value", FieldRule::string()),
    ))
}

/// Page rule body; `strict` makes targets and actions mandatory.
fn rule(strict: bool) -> FieldRule {
    let (targets, actions) = if strict {
        (targets().required(), actions().required())
    } else {
        (targets(), actions())
    };
    object_body(
        ObjectSchema::new()
            .field("targets", targets)
            .field("actions", actions)
            .field("priority", FieldRule::number())
            .field("status", FieldRule::string().valid(["active", "disabled"])),
    )
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::get("zone_page_rules_get_all", "zones/:zone_identifier/pagerules")
            .params(zone_params())
            .query(
                sorted_listing()
                    .field("order", FieldRule::string().valid(["status", "priority"])),
            ),
        Endpoint::get(
            "zone_page_rules_get",
            "zones/:zone_identifier/pagerules/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::post("zone_page_rules_new", "zones/:zone_identifier/pagerules")
            .params(zone_params())
            .body(rule(true)),
        Endpoint::put(
            "zone_page_rules_update",
            "zones/:zone_identifier/pagerules/:identifier",
        )
        .params(zone_item_params())
        .body(rule(true)),
        Endpoint::patch(
            "zone_page_rules_change",
            "zones/:zone_identifier/pagerules/:identifier",
        )
        .params(zone_item_params())
        .body(rule(false)),
        Endpoint::delete(
            "zone_page_rules_destroy",
            "zones/:zone_identifier/pagerules/:identifier",
        )
        .params(zone_item_params()),
    ]
}
