//! Organizations, their members, invites and roles, plus the user's own
//! organization memberships.

use super::{
    Endpoint, id, item_params, listing, object_body, organization_item_params,
    organization_params, sorted_listing,
};
use crate::validator::{FieldRule, ObjectSchema};

fn roles() -> FieldRule {
    FieldRule::array()
        .items(FieldRule::object(ObjectSchema::new().field("id", id())))
        .min_items(1)
        .required()
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::get("user_organization_get_all", "user/organizations").query(
            sorted_listing()
                .field("status", FieldRule::string().valid(["member", "invited"]))
                .field("name", FieldRule::string().max_len(100))
                .field("order", FieldRule::string().valid(["id", "name", "status"])),
        ),
        Endpoint::get("user_organization_get", "user/organizations/:identifier")
            .params(item_params()),
        Endpoint::delete("user_organization_destroy", "user/organizations/:identifier")
            .params(item_params()),
        Endpoint::get("organization_get", "organizations/:organization_identifier")
            .params(organization_params()),
        Endpoint::patch("organization_update", "organizations/:organization_identifier")
            .params(organization_params())
            .body(object_body(
                ObjectSchema::new().field("name", FieldRule::string().max_len(100).required()),
            )),
        Endpoint::get(
            "organization_member_get_all",
            "organizations/:organization_identifier/members",
        )
        .params(organization_params())
        .query(listing()),
        Endpoint::get(
            "organization_member_get",
            "organizations/:organization_identifier/members/:identifier",
        )
        .params(organization_item_params()),
        Endpoint::patch(
            "organization_member_update",
            "organizations/:organization_identifier/members/:identifier",
        )
        .params(organization_item_params())
        .body(object_body(ObjectSchema::new().field("roles", roles()))),
        Endpoint::delete(
            "organization_member_destroy",
            "organizations/:organization_identifier/members/:identifier",
        )
        .params(organization_item_params()),
        Endpoint::post(
            "organization_invite_new",
            "organizations/:organization_identifier/invites",
        )
        .params(organization_params())
        .body(object_body(
            ObjectSchema::new()
                .field(
                    "invited_member_email",
                    FieldRule::string().max_len(90).required(),
                )
                .field("roles", roles()),
        )),
        Endpoint::get(
            "organization_invite_get_all",
            "organizations/:organization_identifier/invites",
        )
        .params(organization_params())
        .query(listing()),
        Endpoint::get(
            "organization_invite_get",
            "organizations/:organization_identifier/invites/:identifier",
        )
        .params(organization_item_params()),
        Endpoint::patch(
            "organization_invite_update",
            "organizations/:organization_identifier/invites/:identifier",
        )
        .params(organization_item_params())
        .body(object_body(ObjectSchema::new().field("roles", roles()))),
        Endpoint::delete(
            "organization_invite_destroy",
            "organizations/:organization_identifier/invites/:identifier",
        )
        .params(organization_item_params()),
        Endpoint::get(
            "organization_role_get_all",
            "organizations/:organization_identifier/roles",
        )
        .params(organization_params())
        .query(listing()),
        Endpoint::get(
            "organization_role_get",
            "organizations/:organization_identifier/roles/:identifier",
        )
        .params(organization_item_params()),
    ]
}
