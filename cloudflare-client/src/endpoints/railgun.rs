use super::{Endpoint, item_params, listing, object_body, zone_item_params, zone_params};
use crate::validator::{FieldRule, ObjectSchema};

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::post("railgun_new", "railguns").body(object_body(
            ObjectSchema::new().field("name", FieldRule::string().max_len(160).required()),
        )),
        Endpoint::get("railgun_get_all", "railguns")
            .query(listing().field("direction", FieldRule::string().valid(["asc", "desc"]))),
        Endpoint::get("railgun_get", "railguns/:identifier").params(item_params()),
        Endpoint::get("railgun_zone_get_all", "railguns/:identifier/zones")
            .params(item_params())
            .query(listing()),
        Endpoint::patch("railgun_enabled_update", "railguns/:identifier")
            .params(item_params())
            .body(object_body(
                ObjectSchema::new().field("enabled", FieldRule::boolean().required()),
            )),
        Endpoint::delete("railgun_destroy", "railguns/:identifier").params(item_params()),
        Endpoint::get("zone_railgun_get_all", "zones/:zone_identifier/railguns")
            .params(zone_params())
            .query(listing()),
        Endpoint::get("zone_railgun_get", "zones/:zone_identifier/railguns/:identifier")
            .params(zone_item_params()),
        Endpoint::get(
            "zone_railgun_diagnose_get",
            "zones/:zone_identifier/railguns/:identifier/diagnose",
        )
        .params(zone_item_params()),
        Endpoint::patch(
            "zone_railgun_connected_update",
            "zones/:zone_identifier/railguns/:identifier",
        )
        .params(zone_item_params())
        .body(object_body(
            ObjectSchema::new().field("connected", FieldRule::boolean().required()),
        )),
    ]
}
