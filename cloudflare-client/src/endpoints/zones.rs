//! Zones: lifecycle, plans, cache purge, custom pages, analytics and Workers.

use serde_json::json;

use super::{
    Endpoint, id, item_params, listing, object_body, sorted_listing, zone_item_params,
    zone_params,
};
use crate::validator::{FieldRule, ObjectSchema};

const MAX_PURGE_ITEMS: usize = 30;

fn analytics_query() -> ObjectSchema {
    let time = || FieldRule::alternatives([FieldRule::string(), FieldRule::number()]);
    ObjectSchema::new()
        .field("since", time())
        .field("until", time())
        .field("exclude_series", FieldRule::boolean())
        .field("continuous", FieldRule::boolean())
}

fn custom_page_params() -> ObjectSchema {
    zone_params().field("identifier", FieldRule::string().required())
}

fn route_params() -> ObjectSchema {
    zone_params().field("route_identifier", FieldRule::string().required())
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::get(
            "zone_available_plan_get_all",
            "zones/:zone_identifier/available_plans",
        )
        .params(zone_params())
        .query(listing()),
        Endpoint::get(
            "zone_available_plan_get",
            "zones/:zone_identifier/available_plans/:identifier",
        )
        .params(zone_item_params()),
        Endpoint::post("zone_new", "zones").body(object_body(
            ObjectSchema::new()
                .field("name", FieldRule::string().max_len(253).required())
                .field("jump_start", FieldRule::boolean())
                .field(
                    "organization",
                    FieldRule::object(
                        ObjectSchema::new()
                            .field("id", id())
                            .field("name", FieldRule::string().max_len(100)),
                    ),
                ),
        )),
        Endpoint::put("zone_activation_check_new", "zones/:identifier/activation_check")
            .params(item_params()),
        Endpoint::get("zone_get_all", "zones").query(
            sorted_listing()
                .field("name", FieldRule::string().max_len(253))
                .field(
                    "status",
                    FieldRule::string().valid([
                        "active",
                        "pending",
                        "initializing",
                        "moved",
                        "deleted",
                        "deactivated",
                    ]),
                )
                .field("order", FieldRule::string().valid(["name", "status", "email"])),
        ),
        Endpoint::get("zone_get", "zones/:identifier").params(item_params()),
        Endpoint::patch("zone_update", "zones/:identifier")
            .params(item_params())
            .body(object_body(
                ObjectSchema::new()
                    .field("paused", FieldRule::boolean())
                    .field("vanity_name_servers", FieldRule::array())
                    .field(
                        "plan",
                        FieldRule::object(
                            ObjectSchema::new().field("id", FieldRule::string().max_len(32)),
                        ),
                    ),
            )),
        Endpoint::delete("zone_destroy", "zones/:identifier").params(item_params()),
        Endpoint::delete("zone_purge_cache", "zones/:identifier/purge_cache")
            .params(item_params())
            .body(object_body(
                ObjectSchema::new().field("purge_everything", FieldRule::boolean().required()),
            ))
            .default_body(json!({"purge_everything": true})),
        Endpoint::delete("zone_purge_cache_by", "zones/:identifier/purge_cache")
            .params(item_params())
            .body(
                FieldRule::alternatives(["files", "tags"].map(|key| {
                    FieldRule::object(ObjectSchema::new().field(
                        key,
                        FieldRule::array().max_items(MAX_PURGE_ITEMS).required(),
                    ))
                }))
                .required(),
            ),
        Endpoint::get("zone_workers_script_get", "zones/:identifier/workers/script")
            .params(item_params())
            .unwrapped(),
        Endpoint::put("zone_workers_script_update", "zones/:identifier/workers/script")
            .params(item_params())
            .body(FieldRule::string().required())
            .content_type("text/javascript"),
        Endpoint::get("zone_workers_routes_get", "zones/:zone_identifier/workers/filters")
            .params(zone_params()),
        Endpoint::post("zone_workers_route_create", "zones/:zone_identifier/workers/filters")
            .params(zone_params())
            .body(FieldRule::object(
                ObjectSchema::new()
                    .field("pattern", FieldRule::string().required())
                    .field("enabled", FieldRule::boolean()),
            )),
        Endpoint::delete(
            "zone_workers_route_delete",
            "zones/:zone_identifier/workers/filters/:route_identifier",
        )
        .params(route_params()),
        Endpoint::put(
            "zone_workers_route_update",
            "zones/:zone_identifier/workers/filters/:route_identifier",
        )
        .params(route_params())
        .body(object_body(
            ObjectSchema::new()
                .field("pattern", FieldRule::string().required())
                .field("enabled", FieldRule::boolean().required()),
        )),
        Endpoint::get("zone_custom_page_get_all", "zones/:zone_identifier/custom_pages")
            .params(zone_params())
            .query(listing()),
        Endpoint::get(
            "zone_custom_page_get",
            "zones/:zone_identifier/custom_pages/:identifier",
        )
        .params(custom_page_params()),
        Endpoint::put(
            "zone_custom_page_update",
            "zones/:zone_identifier/custom_pages/:identifier",
        )
        .params(custom_page_params())
        .body(object_body(
            ObjectSchema::new()
                .field("url", FieldRule::string().required())
                .field(
                    "state",
                    FieldRule::string().valid(["default", "customized"]).required(),
                ),
        )),
        Endpoint::get(
            "zone_analytics_dashboard_get",
            "zones/:zone_identifier/analytics/dashboard",
        )
        .params(zone_params())
        .query(analytics_query()),
        Endpoint::get(
            "zone_analytics_colos_get_all",
            "zones/:zone_identifier/analytics/colos",
        )
        .params(zone_params())
        .query(analytics_query().layered_over(&listing())),
    ]
}
