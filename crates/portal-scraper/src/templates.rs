//! Versioned query templates for the portal's listing endpoints.
//!
//! The listing page exposes roughly a hundred filter columns; these templates
//! are the exact query strings the portal's own search form submits, with
//! every filter blank except the ones driving the report. Treat them as an
//! external contract: change a template only together with the portal, and
//! never edit individual filters in place.
//!
//! Substitution points are literal placeholder tokens, filled by
//! [`render`]:
//!
//! | Token | Value |
//! |---|---|
//! | [`STATUS_TOKEN`] | numeric status filter id |
//! | [`START_TOKEN`] | window start, `MM/DD/YYYY`, form-encoded |
//! | [`END_TOKEN`] | window end, `MM/DD/YYYY`, form-encoded |

use portal_core::DateRange;

use crate::parse::quote_plus;

pub const STATUS_TOKEN: &str = "REPLACE_STATUS";
pub const START_TOKEN: &str = "REPLACE_START";
pub const END_TOKEN: &str = "REPLACE_END";

pub const CONVERSION_FORM_PATH: &str = "/scripts/lead-to-appointment-conversion/index.html";
pub const CONVERSION_EXPORT_PATH: &str =
    "/scripts/report_as_spreadsheet.html?report=report_lead_to_appointment_conversion";
pub const REVENUE_RANKING_PATH: &str = "/scripts/location_sales_rankings.html";

/// Jobs whose status-update date for one status (`status_field_name_for_filter`)
/// falls inside the window. Exports the `ID` and location columns.
pub const JOB_STATUS_QUERY: &str = concat!(
    "/listjobs.html?dsraas=1&id=&location_id=&zone=&zone_id=&production_priority_ge=&",
    "production_priority_le=&opportunity=&opportunity_id=&customer=&customer_id=&",
    "campaign_source=&customer_id_sub_filters_campaign_source_id=&",
    "customer_id_sub_filters_firstname=&customer_id_sub_filters_lastname=&",
    "customer_id_sub_filters_spouse=&customer_id_sub_filters_preferred_phone=&",
    "customer_id_sub_filters_cell_phone=&customer_id_sub_filters_emailaddr=&city=&state_id=&",
    "country_id=&latitude_ge=&latitude_le=&longitude_ge=&longitude_le=&location_tax_rate_id=&",
    "total_cost_ge=&total_cost_le=&material_total_ge=&material_total_le=&labor_total_ge=&",
    "labor_total_le=&delivery_total_ge=&delivery_total_le=&discount_total_ge=&",
    "discount_total_le=&credit_memo_total_ge=&credit_memo_total_le=&tax_total_ge=&",
    "tax_total_le=&order_total_ge=&order_total_le=&amount_paid_ge=&amount_paid_le=&",
    "amount_due_ge=&amount_due_le=&designer_id=&tma_id=&relationship_partner_id=&",
    "installer_id=&shipping_type_id=&number_of_items_ge=&number_of_items_le=&",
    "manufacturing_batch_id=&manufacturing_facility_id=&manufacturing_status_id=&",
    "date_submitted_to_manufacturing_ge=&date_submitted_to_manufacturing_le=&",
    "date_submitted_to_manufacturing_r=select&number_of_days_ago_submitted_to_go_ge=&",
    "number_of_days_ago_submitted_to_go_le=&number_of_biz_days_at_manufacturing_status_ge=&",
    "number_of_biz_days_at_manufacturing_status_le=&",
    "date_submitted_to_manufacturing_partner_ge=&date_submitted_to_manufacturing_partner_le=&",
    "date_submitted_to_manufacturing_partner_r=select&date_projected_to_ship_ge=&",
    "date_projected_to_ship_le=&date_projected_to_ship_r=select&date_shipped_ge=&",
    "date_shipped_le=&date_shipped_r=select&carrier_id=&tracking_number=&date_delivered_ge=&",
    "date_delivered_le=&date_delivered_r=select&commission_rate_type_id=&",
    "designer_commission_override_percentage_ge=&designer_commission_override_percentage_le=&",
    "tma_commission_rate_type_id=&tma_commission_has_been_paid_y=y&",
    "tma_commission_has_been_paid_n=n&job_type_id=&current_status_ids%5B%5D=2&",
    "current_status_ids%5B%5D=3&current_status_ids%5B%5D=5&current_status_ids%5B%5D=6&",
    "current_status_ids%5B%5D=7&current_status_ids%5B%5D=8&current_status_ids%5B%5D=9&",
    "current_status_ids%5B%5D=10&current_status_ids%5B%5D=11&current_status_ids%5B%5D=12&",
    "current_status_ids%5B%5D=13&current_status_ids%5B%5D=21&current_status_ids%5B%5D=22&",
    "current_status_ids%5B%5D=23&current_status_ids%5B%5D=24&current_status_ids%5B%5D=25&",
    "current_status_ids%5B%5D=30&current_status_ids%5B%5D=31&current_status_ids%5B%5D=33&",
    "current_status_ids%5B%5D=34&current_status_ids%5B%5D=37&current_status_ids%5B%5D=38&",
    "date_of_last_status_change_ge=&date_of_last_status_change_le=&",
    "date_of_last_status_change_r=select&promotion_id=&date_placed_ge=&date_placed_le=&",
    "date_placed_r=select&date_of_initial_appointment_ge=&date_of_initial_appointment_le=&",
    "date_of_initial_appointment_r=select&date_of_welcome_call_ge=&date_of_welcome_call_le=&",
    "date_of_welcome_call_r=select&date_measurements_scheduled_ge=&",
    "date_measurements_scheduled_le=&date_measurements_scheduled_r=select&",
    "date_installation_scheduled_ge=&date_installation_scheduled_le=&",
    "date_installation_scheduled_r=select&date_of_final_payment_ge=&date_of_final_payment_le=&",
    "date_of_final_payment_r=select&date_completed_ge=&date_completed_le=&",
    "date_completed_r=select&date_last_payment_ge=&date_last_payment_le=&",
    "date_last_payment_r=select&payment_type_id=&memo=&payment_value_lookup=&time_est=&",
    "job_survey_response_id=&is_rush_y=y&is_rush_n=n&rush_is_billable_y=y&",
    "rush_is_billable_n=n&is_split_order_y=y&is_split_order_n=n&exclude_from_close_rate_y=y&",
    "exclude_from_close_rate_n=n&exclude_from_average_sale_y=y&exclude_from_average_sale_n=n&",
    "number_of_basics_ge=&number_of_basics_le=&number_of_classics_ge=&number_of_classics_le=&",
    "number_of_designers_ge=&number_of_designers_le=&number_of_shelves_ge=&",
    "number_of_shelves_le=&number_of_dividers_ge=&number_of_dividers_le=&",
    "number_of_accessories_ge=&number_of_accessories_le=&number_of_strip_mounts_ge=&",
    "number_of_strip_mounts_le=&number_of_other_ge=&number_of_other_le=&number_of_options_ge=&",
    "number_of_options_le=&nps_survey_rating_ge=&nps_survey_rating_le=&wm_note=&active_y=y&",
    "date_last_modified_ge=&date_last_modified_le=&date_last_modified_r=select&date_added_ge=&",
    "date_added_le=&date_added_r=select&status_field_name_for_filter=REPLACE_STATUS&",
    "status_update_search_date_ge=REPLACE_START&status_update_search_date_le=REPLACE_END&",
    "status_update_search_date_r=select&sort_by=id&sort_dir=DESC&display=on&c%5B%5D=id&",
    "c%5B%5D=location_id&filter=Submit",
);

/// Jobs shipped inside the window (`date_shipped_ge/le`), any status.
/// Exports ID, location, order total and ship date.
pub const SHIPPED_JOBS_QUERY: &str = concat!(
    "/listjobs.html?dsraas=1&id=&location_id=&",
    "location_id_sub_filters_exclude_from_reports_n=n&zone=&zone_id=&production_priority_ge=&",
    "production_priority_le=&opportunity=&opportunity_id=&customer=&customer_id=&",
    "campaign_source=&customer_id_sub_filters_campaign_source_id=&",
    "customer_id_sub_filters_firstname=&customer_id_sub_filters_lastname=&",
    "customer_id_sub_filters_spouse=&customer_id_sub_filters_preferred_phone=&",
    "customer_id_sub_filters_cell_phone=&customer_id_sub_filters_emailaddr=&city=&state_id=&",
    "country_id=&latitude_ge=&latitude_le=&longitude_ge=&longitude_le=&location_tax_rate_id=&",
    "total_cost_ge=&total_cost_le=&material_total_ge=&material_total_le=&labor_total_ge=&",
    "labor_total_le=&delivery_total_ge=&delivery_total_le=&discount_total_ge=&",
    "discount_total_le=&credit_memo_total_ge=&credit_memo_total_le=&tax_total_ge=&",
    "tax_total_le=&order_total_ge=&order_total_le=&amount_paid_ge=&amount_paid_le=&",
    "amount_due_ge=&amount_due_le=&siteuser=&designer_id=&tma_id=&relationship_partner_id=&",
    "installer_id=&shipping_type_id=&number_of_items_ge=&number_of_items_le=&",
    "manufacturing_batch_id=&manufacturing_facility_id=&manufacturing_status_id=&",
    "date_submitted_to_manufacturing_ge=&date_submitted_to_manufacturing_le=&",
    "date_submitted_to_manufacturing_r=select&number_of_days_ago_submitted_to_go_ge=&",
    "number_of_days_ago_submitted_to_go_le=&number_of_biz_days_at_manufacturing_status_ge=&",
    "number_of_biz_days_at_manufacturing_status_le=&",
    "date_submitted_to_manufacturing_partner_ge=&date_submitted_to_manufacturing_partner_le=&",
    "date_submitted_to_manufacturing_partner_r=select&date_projected_to_ship_ge=&",
    "date_projected_to_ship_le=&date_projected_to_ship_r=select&date_shipped_ge=REPLACE_START&",
    "date_shipped_le=REPLACE_END&date_shipped_r=select&carrier_id=&tracking_number=&",
    "date_delivered_ge=&date_delivered_le=&date_delivered_r=select&commission_rate_type_id=&",
    "designer_commission_override_percentage_ge=&designer_commission_override_percentage_le=&",
    "tma_commission_rate_type_id=&tma_commission_has_been_paid_y=y&",
    "tma_commission_has_been_paid_n=n&job_type_id=&%63urrent_status_ids%5B%5D=21&",
    "%63urrent_status_ids%5B%5D=22&%63urrent_status_ids%5B%5D=2&%63urrent_status_ids%5B%5D=3&",
    "%63urrent_status_ids%5B%5D=23&%63urrent_status_ids%5B%5D=5&%63urrent_status_ids%5B%5D=24&",
    "%63urrent_status_ids%5B%5D=33&%63urrent_status_ids%5B%5D=6&%63urrent_status_ids%5B%5D=34&",
    "%63urrent_status_ids%5B%5D=37&%63urrent_status_ids%5B%5D=38&%63urrent_status_ids%5B%5D=7&",
    "%63urrent_status_ids%5B%5D=8&%63urrent_status_ids%5B%5D=9&%63urrent_status_ids%5B%5D=30&",
    "%63urrent_status_ids%5B%5D=10&%63urrent_status_ids%5B%5D=11&",
    "%63urrent_status_ids%5B%5D=31&%63urrent_status_ids%5B%5D=25&",
    "%63urrent_status_ids%5B%5D=12&%63urrent_status_ids%5B%5D=13&",
    "date_of_last_status_change_ge=&date_of_last_status_change_le=&",
    "date_of_last_status_change_r=select&promotion_id=&date_placed_ge=&date_placed_le=&",
    "date_placed_r=select&date_of_initial_appointment_ge=&date_of_initial_appointment_le=&",
    "date_of_initial_appointment_r=select&date_of_welcome_call_ge=&date_of_welcome_call_le=&",
    "date_of_welcome_call_r=select&date_measurements_scheduled_ge=&",
    "date_measurements_scheduled_le=&date_measurements_scheduled_r=select&",
    "date_installation_scheduled_ge=&date_installation_scheduled_le=&",
    "date_installation_scheduled_r=select&date_of_final_payment_ge=&date_of_final_payment_le=&",
    "date_of_final_payment_r=select&date_completed_ge=&date_completed_le=&",
    "date_completed_r=select&date_last_payment_ge=&date_last_payment_le=&",
    "date_last_payment_r=select&payment_type_id=&memo=&payment_value_lookup=&time_est=&",
    "job_survey_response_id=&is_rush_y=y&is_rush_n=n&rush_is_billable_y=y&",
    "rush_is_billable_n=n&is_split_order_y=y&is_split_order_n=n&exclude_from_close_rate_y=y&",
    "exclude_from_close_rate_n=n&exclude_from_average_sale_y=y&exclude_from_average_sale_n=n&",
    "number_of_basics_ge=&number_of_basics_le=&number_of_classics_ge=&number_of_classics_le=&",
    "number_of_designers_ge=&number_of_designers_le=&number_of_shelves_ge=&",
    "number_of_shelves_le=&number_of_dividers_ge=&number_of_dividers_le=&",
    "number_of_accessories_ge=&number_of_accessories_le=&number_of_strip_mounts_ge=&",
    "number_of_strip_mounts_le=&number_of_other_ge=&number_of_other_le=&number_of_options_ge=&",
    "number_of_options_le=&nps_survey_rating_ge=&nps_survey_rating_le=&wm_note=&active_y=y&",
    "date_last_modified_ge=&date_last_modified_le=&date_last_modified_r=select&date_added_ge=&",
    "date_added_le=&date_added_r=select&status_field_name_for_filter=23&",
    "status_update_search_date_ge=&status_update_search_date_le=&",
    "status_update_search_date_r=inpast&sort_by=id&sort_dir=DESC&c%5B%5D=id&",
    "c%5B%5D=location_id&c%5B%5D=order_total&c%5B%5D=date_shipped&filter=Submit",
);

/// Fills the date tokens (and the status token, when given) of `template`.
#[must_use]
pub fn render(template: &str, status_filter_id: Option<u32>, range: &DateRange) -> String {
    let (start, end) = range.portal_format();
    let rendered = template
        .replace(START_TOKEN, &quote_plus(&start))
        .replace(END_TOKEN, &quote_plus(&end));
    match status_filter_id {
        Some(id) => rendered.replace(STATUS_TOKEN, &id.to_string()),
        None => rendered,
    }
}
