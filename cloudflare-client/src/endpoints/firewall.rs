//! IP access rules (user, zone and organization level) and WAF packages.

use super::{
    Endpoint, id, item_params, object_body, organization_item_params, organization_params,
    sorted_listing, zone_item_params, zone_params,
};
use crate::validator::{FieldRule, ObjectSchema};

const MODES: [&str; 3] = ["block", "challenge", "whitelist"];
const TARGETS: [&str; 3] = ["ip", "ip_range", "country"];

fn access_rule_listing() -> ObjectSchema {
    sorted_listing()
        .field("mode", FieldRule::string().valid(MODES))
        .field("configuration_target", FieldRule::string().valid(TARGETS))
        .field("configuration_value", FieldRule::string())
        .field(
            "order",
            FieldRule::string().valid(["configuration_target", "configuration_value", "mode"]),
        )
}

fn access_rule() -> FieldRule {
    object_body(
        ObjectSchema::new()
            .field("mode", FieldRule::string().valid(MODES).required())
            .field(
                "configuration",
                FieldRule::object(
                    ObjectSchema::new()
                        .field("target", FieldRule::string().valid(TARGETS).required())
                        .field("value", FieldRule::string().required()),
                )
                .required(),
            )
            .field("notes", FieldRule::string()),
    )
}

fn package_params() -> ObjectSchema {
    zone_params().field("package_identifier", id())
}

fn group_params() -> ObjectSchema {
    package_params().field("identifier", id())
}

fn package_rule_params() -> ObjectSchema {
    package_params().field("identifier", FieldRule::string().required())
}

fn access_rules() -> Vec<Endpoint> {
    vec![
        Endpoint::get(
            "zone_firewall_access_rule_get_all",
            "zones/:zone_identifier/firewall/access_rules/rules",
        )
        .params(zone_params())
        .query(access_rule_listing()),
        Endpoint::post(
            "zone_firewall_access_rule_new",
            "zones/:zone_identifier/firewall/access_rules/rules",
        )
        .params(zone_params())
        .body(access_rule()),
        Endpoint::patch(
            "zone_firewall_access_rule_update",
            "zones/:zone_identifier/firewall/access_rules/rules/:identifier",
        )
        .params(zone_item_params())
        .body(access_rule()),
        Endpoint::delete(
            "zone_firewall_access_rule_destroy",
            "zones/:zone_identifier/firewall/access_rules/rules/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::get(
            "user_firewall_access_rule_get_all",
            "user/firewall/access_rules/rules",
        )
        .query(access_rule_listing()),
        Endpoint::post("user_firewall_access_rule_new", "user/firewall/access_rules/rules")
            .body(access_rule()),
        Endpoint::patch(
            "user_firewall_access_rule_update",
            "user/firewall/access_rules/rules/:identifier",
        )
        .params(item_params())
        .body(access_rule()),
        Endpoint::delete(
            "user_firewall_access_rule_destroy",
            "user/firewall/access_rules/rules/:identifier",
        )
        .params(item_params()),
        Endpoint::get(
            "organization_firewall_access_rule_get_all",
            "organizations/:organization_identifier/firewall/access_rules/rules",
        )
        .params(organization_params())
        .query(access_rule_listing()),
        Endpoint::post(
            "organization_firewall_access_rule_new",
            "organizations/:organization_identifier/firewall/access_rules/rules",
        )
        .params(organization_params())
        .body(access_rule()),
        Endpoint::patch(
            "organization_firewall_access_rule_update",
            "organizations/:organization_identifier/firewall/access_rules/rules/:identifier",
        )
        .params(organization_item_params())
        .body(access_rule()),
        Endpoint::delete(
            "organization_firewall_access_rule_destroy",
            "organizations/:organization_identifier/firewall/access_rules/rules/:identifier",
        )
        .params(organization_item_params()),
    ]
}

fn waf() -> Vec<Endpoint> {
    vec![
        Endpoint::get(
            "zone_firewall_waf_package_get_all",
            "zones/:zone_identifier/firewall/waf/packages",
        )
        .params(zone_params())
        .query(
            sorted_listing()
                .field("name", FieldRule::string())
                .field("order", FieldRule::string()),
        ),
        Endpoint::get(
            "zone_firewall_waf_package_get",
            "zones/:zone_identifier/firewall/waf/packages/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::patch(
            "zone_firewall_waf_package_update",
            "zones/:zone_identifier/firewall/waf/packages/:identifier",
        )
        .params(zone_item_params())
        .body(object_body(
            ObjectSchema::new()
                .field("sensitivity", FieldRule::string().valid(["high", "low", "off"]))
                .field(
                    "action_mode",
                    FieldRule::string().valid(["simulate", "block", "challenge"]),
                )
                .min_keys(1),
        )),
        Endpoint::get(
            "zone_firewall_waf_rule_group_get_all",
            "zones/:zone_identifier/firewall/waf/packages/:package_identifier/groups",
        )
        .params(package_params())
        .query(
            sorted_listing()
                .field("name", FieldRule::string())
                .field("mode", FieldRule::string().valid(["on", "off"]))
                .field("rules_count", FieldRule::number())
                .field("order", FieldRule::string().valid(["mode", "rules_count"])),
        ),
        Endpoint::get(
            "zone_firewall_waf_rule_group_get",
            "zones/:zone_identifier/firewall/waf/packages/:package_identifier/groups/:identifier",
        )
        .params(group_params()),
        Endpoint::patch(
            "zone_firewall_waf_rule_group_update",
            "zones/:zone_identifier/firewall/waf/packages/:package_identifier/groups/:identifier",
        )
        .params(group_params())
        .body(object_body(
            ObjectSchema::new().field("mode", FieldRule::string().valid(["on", "off"])),
        )),
        Endpoint::get(
            "zone_firewall_waf_package_rule_get_all",
            "zones/:zone_identifier/firewall/waf/packages/:package_identifier/rules",
        )
        .params(package_params())
        .query(
            sorted_listing()
                .field("description", FieldRule::string())
                .field("mode", FieldRule::any())
                .field("priority", FieldRule::number())
                .field("group_id", FieldRule::string().exact_len(32))
                .field(
                    "order",
                    FieldRule::string().valid(["priority", "group_id", "description"]),
                ),
        ),
        Endpoint::get(
            "zone_firewall_waf_package_rule_get",
            "zones/:zone_identifier/firewall/waf/packages/:package_identifier/rules/:identifier",
        )
        .params(package_rule_params()),
        Endpoint::patch(
            "zone_firewall_waf_package_rule_update",
            "zones/:zone_identifier/firewall/waf/packages/:package_identifier/rules/:identifier",
        )
        .params(package_rule_params())
        .body(object_body(ObjectSchema::new().field(
            "mode",
            FieldRule::string()
                .valid([
                    "default",
                    "disable",
                    "simulate",
                    "block",
                    "challenge",
                    "on",
                    "off",
                ])
                .required(),
        ))),
    ]
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    let mut all = access_rules();
    all.extend(waf());
    all
}
