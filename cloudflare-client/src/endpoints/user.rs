//! User, billing profile, subscriptions and invites.

use super::{Endpoint, item_params, listing, object_body, sorted_listing};
use crate::validator::{FieldRule, ObjectSchema};

fn billing_profile() -> ObjectSchema {
    ObjectSchema::new()
        .field("first_name", FieldRule::string().max_len(50).required())
        .field("last_name", FieldRule::string().max_len(90).required())
        .field("address", FieldRule::string().max_len(100).required())
        .field("city", FieldRule::string().max_len(80).required())
        .field("state", FieldRule::string().max_len(40).required())
        .field("zipcode", FieldRule::string().max_len(25).required())
        .field("country", FieldRule::string().max_len(50).required())
        .field("telephone", FieldRule::string().max_len(20).required())
        .field("card_number", FieldRule::string().max_len(19).required())
        .field("card_expiry_year", FieldRule::number().required())
        .field("card_expiry_month", FieldRule::number().required())
        .field("card_cvv", FieldRule::string().max_len(4).required())
        .field("address2", FieldRule::string().max_len(100))
        .field("vat", FieldRule::string().max_len(255))
}

fn subscription_listing() -> ObjectSchema {
    sorted_listing()
        .field(
            "order",
            FieldRule::string().valid([
                "created_on",
                "expires_on",
                "activated_on",
                "renewed_on",
                "cancelled_on",
                "name",
                "status",
                "price",
            ]),
        )
        .field("status", FieldRule::string().valid(["active", "expired", "cancelled"]))
        .field("price", FieldRule::number())
        .field("activated_on", FieldRule::string())
        .field("expires_on", FieldRule::string())
        .field("expired_on", FieldRule::string())
        .field("cancelled_on", FieldRule::string())
        .field("renewed_on", FieldRule::string())
        .field("occured_at", FieldRule::string())
        .field("action", FieldRule::string())
}

pub(super) fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::post("user_billing_profile_new", "user/billing/profile")
            .body(object_body(billing_profile())),
        Endpoint::put("user_billing_profile_update", "user/billing/profile")
            .body(object_body(billing_profile())),
        Endpoint::patch("user_billing_profile_vat_update", "user/billing/profile").body(
            object_body(
                ObjectSchema::new().field("vat", FieldRule::string().max_len(255).required()),
            ),
        ),
        Endpoint::get("user_billing_profile_get", "user/billing/profile"),
        Endpoint::delete("user_billing_profile_destroy", "user/billing/profile"),
        Endpoint::get("user_billing_history_get_all", "user/billing/history").query(
            listing()
                .field("order", FieldRule::string().valid(["type", "occured_at", "action"]))
                .field("type", FieldRule::string())
                .field("occured_at", FieldRule::string())
                .field("action", FieldRule::string()),
        ),
        Endpoint::get(
            "user_billing_subscriptions_app_get_all",
            "user/billing/subscriptions/apps",
        )
        .query(subscription_listing()),
        Endpoint::get(
            "user_billing_subscriptions_app_get",
            "user/billing/subscriptions/apps/:identifier",
        )
        .params(item_params()),
        Endpoint::get(
            "user_billing_subscriptions_zone_get_all",
            "user/billing/subscriptions/zones",
        )
        .query(subscription_listing()),
        Endpoint::get(
            "user_billing_subscriptions_zone_get",
            "user/billing/subscriptions/zones/:identifier",
        )
        .params(item_params()),
        Endpoint::get("user_get", "user"),
        Endpoint::patch("user_update", "user").body(object_body(
            ObjectSchema::new()
                .field("first_name", FieldRule::string().max_len(60))
                .field("last_name", FieldRule::string().max_len(60))
                .field("telephone", FieldRule::string().max_len(20))
                .field("country", FieldRule::string().max_len(30))
                .field("zipcode", FieldRule::string().max_len(20)),
        )),
        Endpoint::get("user_invite_get_all", "user/invites").query(listing()),
        Endpoint::get("user_invite_get", "user/invites/:identifier").params(item_params()),
        Endpoint::patch("user_invite_update", "user/invites/:identifier")
            .params(item_params())
            .body(object_body(ObjectSchema::new().field(
                "status",
                FieldRule::string().valid(["accepted", "rejected"]).required(),
            ))),
    ]
}
