// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Diesel table definitions for the workflow schema.
//!
//! These definitions mirror the SQL in `migrations/` and must stay in
//! lockstep with it.

diesel::table! {
    visit_requests (request_id) {
        request_id -> BigInt,
        employee_name -> Text,
        site_city -> Text,
        project -> Text,
        reason -> Text,
        duration_days -> Integer,
        advance -> Double,
        date_of_journey -> Nullable<Text>,
        submitted_at -> Text,
        status -> Text,
        admin_status -> Text,
        payment_status -> Text,
        approved_by -> Nullable<Text>,
        approved_by_admin -> Nullable<Text>,
        rejected_by -> Nullable<Text>,
        admin_rejection_reason -> Nullable<Text>,
        manager_comment -> Nullable<Text>,
        admin_comment -> Nullable<Text>,
        paid_at -> Nullable<Text>,
        paid_by -> Nullable<Text>,
        manager_edit_json -> Nullable<Text>,
    }
}

diesel::table! {
    audit_events (event_id) {
        event_id -> BigInt,
        request_id -> Nullable<BigInt>,
        actor_json -> Text,
        cause_json -> Text,
        action_json -> Text,
        before_snapshot -> Text,
        after_snapshot -> Text,
        recorded_at -> Text,
    }
}

diesel::table! {
    accounts (account_id) {
        account_id -> BigInt,
        login_name -> Text,
        display_name -> Text,
        password_hash -> Text,
        role -> Text,
        is_disabled -> Integer,
        created_at -> Text,
        last_login_at -> Nullable<Text>,
    }
}

diesel::table! {
    sessions (session_id) {
        session_id -> BigInt,
        session_token -> Text,
        account_id -> BigInt,
        created_at -> Text,
        expires_at -> Text,
        last_active_at -> Nullable<Text>,
    }
}

diesel::table! {
    notifications (notification_id) {
        notification_id -> BigInt,
        recipient_role -> Text,
        message -> Text,
        notification_type -> Text,
        request_id -> Nullable<BigInt>,
        from_user -> Nullable<Text>,
        from_role -> Nullable<Text>,
        is_read -> Integer,
        created_at -> Text,
    }
}

diesel::joinable!(sessions -> accounts (account_id));

diesel::allow_tables_to_appear_in_same_query!(
    visit_requests,
    audit_events,
    accounts,
    sessions,
    notifications,
);
