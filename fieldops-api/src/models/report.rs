//! Report models: the field-service visit record and its owned rows.
//!
//! A report owns exactly one schedule, one equipment record, and one service
//! record, plus three child collections (descriptions, procedures, gallery)
//! that are replaced wholesale on every update.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::{Identifiable, Insertable, Queryable};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::require_field;

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::reports)]
#[ts(export)]
pub struct Report {
    pub id: i32,
    pub order_id: i32,
    pub author_id: String,
    #[ts(type = "string")]
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::reports)]
pub struct NewReport {
    pub order_id: i32,
    pub author_id: String,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::report_schedules)]
#[ts(export)]
pub struct ReportSchedule {
    pub id: i32,
    pub report_id: i32,
    #[ts(type = "string")]
    pub visit_date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::report_schedules)]
pub struct NewReportSchedule {
    pub report_id: i32,
    pub visit_date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::report_equipment)]
#[ts(export)]
pub struct ReportEquipment {
    pub id: i32,
    pub report_id: i32,
    pub location: String,
    pub name: String,
    pub model: String,
    pub serial: String,
    pub tag: String,
    pub kind: String,
    pub description: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::report_equipment)]
pub struct NewReportEquipment {
    pub report_id: i32,
    pub location: String,
    pub name: String,
    pub model: String,
    pub serial: String,
    pub tag: String,
    pub kind: String,
    pub description: String,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::report_services)]
#[ts(export)]
pub struct ReportService {
    pub id: i32,
    pub report_id: i32,
    pub diagnostic: String,
    pub recommendation: String,
    pub additional_info: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::report_services)]
pub struct NewReportService {
    pub report_id: i32,
    pub diagnostic: String,
    pub recommendation: String,
    pub additional_info: String,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::report_descriptions)]
#[ts(export)]
pub struct ReportDescription {
    pub id: i32,
    pub report_id: i32,
    pub description: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::report_descriptions)]
pub struct NewReportDescription {
    pub report_id: i32,
    pub description: String,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::report_procedures)]
#[ts(export)]
pub struct ReportProcedure {
    pub id: i32,
    pub report_id: i32,
    pub description: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::report_procedures)]
pub struct NewReportProcedure {
    pub report_id: i32,
    pub description: String,
}

#[derive(Deserialize, Queryable, Identifiable, Debug, Serialize, TS)]
#[diesel(table_name = crate::schema::report_gallery)]
#[ts(export)]
pub struct GalleryItem {
    pub id: i32,
    pub report_id: i32,
    pub image_url: String,
    pub comment: String,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::report_gallery)]
pub struct NewGalleryItem {
    pub report_id: i32,
    pub image_url: String,
    pub comment: String,
}

// API input shapes. The report payload arrives one level nested, mirroring
// the form sections on the dashboard.

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ReportScheduleInput {
    #[ts(type = "string")]
    pub visit_date: NaiveDate,
    pub start_time: String,
    pub end_time: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ReportEquipmentInput {
    pub location: String,
    pub name: String,
    pub model: String,
    pub serial: String,
    pub tag: String,
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ReportServiceInput {
    pub diagnostic: String,
    pub recommendation: String,
    pub additional_info: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ReportDescriptionInput {
    pub description: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct GalleryItemInput {
    pub image_url: String,
    pub comment: String,
}

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct ReportInput {
    pub schedule: ReportScheduleInput,
    pub equipment: ReportEquipmentInput,
    pub service: ReportServiceInput,
    pub descriptions: Vec<ReportDescriptionInput>,
    pub procedures: Vec<ReportDescriptionInput>,
    pub gallery: Vec<GalleryItemInput>,
}

impl ReportInput {
    /// Fails fast with the first offending field, in form order.
    pub fn validate(&self) -> Result<(), String> {
        require_field(&self.schedule.start_time, "schedule.start_time")?;
        require_field(&self.equipment.location, "equipment.location")?;
        require_field(&self.equipment.name, "equipment.name")?;
        require_field(&self.equipment.model, "equipment.model")?;
        require_field(&self.equipment.serial, "equipment.serial")?;
        require_field(&self.equipment.tag, "equipment.tag")?;
        require_field(&self.equipment.kind, "equipment.kind")?;
        require_field(&self.equipment.description, "equipment.description")?;
        require_field(&self.service.diagnostic, "service.diagnostic")?;
        require_field(&self.service.recommendation, "service.recommendation")?;
        require_field(&self.service.additional_info, "service.additional_info")?;
        if self.descriptions.is_empty() {
            return Err("descriptions is required".to_string());
        }
        if self.procedures.is_empty() {
            return Err("procedures is required".to_string());
        }
        Ok(())
    }
}

/// The full report graph returned by the detail endpoints.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportDetail {
    pub report: Report,
    pub schedule: ReportSchedule,
    pub equipment: ReportEquipment,
    pub service: ReportService,
    pub descriptions: Vec<ReportDescription>,
    pub procedures: Vec<ReportProcedure>,
    pub gallery: Vec<GalleryItem>,
}
