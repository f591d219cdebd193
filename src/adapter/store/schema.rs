diesel::table! {
    valuation_records (id) {
        id -> Text,
        vin -> Text,
        user_device_id -> Nullable<Text>,
        vehicle_token_id -> Nullable<BigInt>,
        request_metadata -> Nullable<Text>,
        drivly_pricing -> Nullable<Text>,
        drivly_offer -> Nullable<Text>,
        edmunds -> Nullable<Text>,
        vincario -> Nullable<Text>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}
