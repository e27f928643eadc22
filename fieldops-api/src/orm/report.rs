//! Report persistence.
//!
//! The one binding consistency rule in the system lives here: on update, a
//! report's child collections (descriptions, procedures, gallery) are
//! replaced wholesale (delete all, then bulk-insert the new set) inside a
//! single transaction. A partial failure must roll back to the prior
//! children, never a half-replaced state. Racing updates are last-writer-
//! wins; SQLite's single-writer locking serializes them.

use diesel::prelude::*;

use crate::models::{
    GalleryItem, NewGalleryItem, NewReport, NewReportDescription, NewReportEquipment,
    NewReportProcedure, NewReportSchedule, NewReportService, Report, ReportDescription,
    ReportDetail, ReportEquipment, ReportInput, ReportProcedure, ReportSchedule, ReportService,
};
use crate::orm::last_insert_rowid;

/// Fetch a report scoped to its parent order. A report id that exists under
/// a different order is treated as absent.
pub fn get_report_in_order(
    conn: &mut SqliteConnection,
    order: i32,
    report: i32,
) -> Result<Option<Report>, diesel::result::Error> {
    use crate::schema::reports::dsl::*;
    let result = reports
        .filter(id.eq(report))
        .filter(order_id.eq(order))
        .first::<Report>(conn)
        .optional()?;
    Ok(result)
}

pub fn get_reports_by_order(
    conn: &mut SqliteConnection,
    order: i32,
) -> Result<Vec<Report>, diesel::result::Error> {
    use crate::schema::reports::dsl::*;
    reports
        .filter(order_id.eq(order))
        .order(id.asc())
        .load::<Report>(conn)
}

/// Loads the full graph for a report row: owned schedule/equipment/service
/// plus the three child collections.
pub fn get_report_detail(
    conn: &mut SqliteConnection,
    report: Report,
) -> Result<ReportDetail, diesel::result::Error> {
    use crate::schema::{
        report_descriptions, report_equipment, report_gallery, report_procedures,
        report_schedules, report_services,
    };

    let schedule = report_schedules::table
        .filter(report_schedules::report_id.eq(report.id))
        .first::<ReportSchedule>(conn)?;
    let equipment = report_equipment::table
        .filter(report_equipment::report_id.eq(report.id))
        .first::<ReportEquipment>(conn)?;
    let service = report_services::table
        .filter(report_services::report_id.eq(report.id))
        .first::<ReportService>(conn)?;
    let descriptions = report_descriptions::table
        .filter(report_descriptions::report_id.eq(report.id))
        .order(report_descriptions::id.asc())
        .load::<ReportDescription>(conn)?;
    let procedures = report_procedures::table
        .filter(report_procedures::report_id.eq(report.id))
        .order(report_procedures::id.asc())
        .load::<ReportProcedure>(conn)?;
    let gallery = report_gallery::table
        .filter(report_gallery::report_id.eq(report.id))
        .order(report_gallery::id.asc())
        .load::<GalleryItem>(conn)?;

    Ok(ReportDetail {
        report,
        schedule,
        equipment,
        service,
        descriptions,
        procedures,
        gallery,
    })
}

/// Deletes every child-collection row for a report. The owned
/// schedule/equipment/service rows are updated in place, not deleted.
pub(crate) fn delete_report_children(
    conn: &mut SqliteConnection,
    report: i32,
) -> Result<(), diesel::result::Error> {
    use crate::schema::{report_descriptions, report_gallery, report_procedures};

    diesel::delete(report_gallery::table.filter(report_gallery::report_id.eq(report)))
        .execute(conn)?;
    diesel::delete(
        report_descriptions::table.filter(report_descriptions::report_id.eq(report)),
    )
    .execute(conn)?;
    diesel::delete(report_procedures::table.filter(report_procedures::report_id.eq(report)))
        .execute(conn)?;
    Ok(())
}

/// Bulk-inserts the child collections from an input payload.
pub(crate) fn insert_report_children(
    conn: &mut SqliteConnection,
    report: i32,
    input: &ReportInput,
) -> Result<(), diesel::result::Error> {
    use crate::schema::{report_descriptions, report_gallery, report_procedures};

    let descriptions: Vec<NewReportDescription> = input
        .descriptions
        .iter()
        .map(|item| NewReportDescription {
            report_id: report,
            description: item.description.clone(),
        })
        .collect();
    diesel::insert_into(report_descriptions::table)
        .values(&descriptions)
        .execute(conn)?;

    let procedures: Vec<NewReportProcedure> = input
        .procedures
        .iter()
        .map(|item| NewReportProcedure {
            report_id: report,
            description: item.description.clone(),
        })
        .collect();
    diesel::insert_into(report_procedures::table)
        .values(&procedures)
        .execute(conn)?;

    let gallery: Vec<NewGalleryItem> = input
        .gallery
        .iter()
        .map(|item| NewGalleryItem {
            report_id: report,
            image_url: item.image_url.clone(),
            comment: item.comment.clone(),
        })
        .collect();
    if !gallery.is_empty() {
        diesel::insert_into(report_gallery::table)
            .values(&gallery)
            .execute(conn)?;
    }
    Ok(())
}

/// Single transaction: insert the report row, its owned rows, and each child
/// collection. Any failure rolls the whole graph back.
pub fn insert_report(
    conn: &mut SqliteConnection,
    order: i32,
    author: &str,
    input: &ReportInput,
) -> Result<ReportDetail, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::{
            report_equipment, report_schedules, report_services, reports,
        };

        let new_report = NewReport {
            order_id: order,
            author_id: author.to_string(),
        };
        diesel::insert_into(reports::table)
            .values(&new_report)
            .execute(conn)?;
        let report_id = last_insert_rowid(conn)?;

        diesel::insert_into(report_schedules::table)
            .values(&NewReportSchedule {
                report_id,
                visit_date: input.schedule.visit_date,
                start_time: input.schedule.start_time.clone(),
                end_time: input.schedule.end_time.clone(),
            })
            .execute(conn)?;

        diesel::insert_into(report_equipment::table)
            .values(&NewReportEquipment {
                report_id,
                location: input.equipment.location.clone(),
                name: input.equipment.name.clone(),
                model: input.equipment.model.clone(),
                serial: input.equipment.serial.clone(),
                tag: input.equipment.tag.clone(),
                kind: input.equipment.kind.clone(),
                description: input.equipment.description.clone(),
            })
            .execute(conn)?;

        diesel::insert_into(report_services::table)
            .values(&NewReportService {
                report_id,
                diagnostic: input.service.diagnostic.clone(),
                recommendation: input.service.recommendation.clone(),
                additional_info: input.service.additional_info.clone(),
            })
            .execute(conn)?;

        insert_report_children(conn, report_id, input)?;

        let report = reports::table
            .filter(reports::id.eq(report_id))
            .first::<Report>(conn)?;
        get_report_detail(conn, report)
    })
}

/// Full replace of a report: the owned schedule/equipment/service rows are
/// updated in place, every prior child row is deleted, and the new child
/// sets are bulk-inserted, all in one transaction, so a failure leaves the
/// prior children intact. Returns Ok(None) if the report is absent from the
/// order.
pub fn replace_report(
    conn: &mut SqliteConnection,
    order: i32,
    report_id: i32,
    author: &str,
    input: &ReportInput,
) -> Result<Option<ReportDetail>, diesel::result::Error> {
    conn.transaction(|conn| {
        use crate::schema::{
            report_equipment, report_schedules, report_services, reports,
        };

        let report = match get_report_in_order(conn, order, report_id)? {
            Some(report) => report,
            None => return Ok(None),
        };

        delete_report_children(conn, report.id)?;

        diesel::update(
            report_schedules::table.filter(report_schedules::report_id.eq(report.id)),
        )
        .set((
            report_schedules::visit_date.eq(input.schedule.visit_date),
            report_schedules::start_time.eq(&input.schedule.start_time),
            report_schedules::end_time.eq(&input.schedule.end_time),
        ))
        .execute(conn)?;

        diesel::update(
            report_equipment::table.filter(report_equipment::report_id.eq(report.id)),
        )
        .set((
            report_equipment::location.eq(&input.equipment.location),
            report_equipment::name.eq(&input.equipment.name),
            report_equipment::model.eq(&input.equipment.model),
            report_equipment::serial.eq(&input.equipment.serial),
            report_equipment::tag.eq(&input.equipment.tag),
            report_equipment::kind.eq(&input.equipment.kind),
            report_equipment::description.eq(&input.equipment.description),
        ))
        .execute(conn)?;

        diesel::update(
            report_services::table.filter(report_services::report_id.eq(report.id)),
        )
        .set((
            report_services::diagnostic.eq(&input.service.diagnostic),
            report_services::recommendation.eq(&input.service.recommendation),
            report_services::additional_info.eq(&input.service.additional_info),
        ))
        .execute(conn)?;

        insert_report_children(conn, report.id, input)?;

        diesel::update(reports::table.filter(reports::id.eq(report.id)))
            .set(reports::author_id.eq(author))
            .execute(conn)?;

        let report = reports::table
            .filter(reports::id.eq(report.id))
            .first::<Report>(conn)?;
        get_report_detail(conn, report).map(Some)
    })
}

/// Hard delete. Owned rows and child collections cascade.
/// Returns Ok(true) if the report was found under the order and deleted.
pub fn delete_report(
    conn: &mut SqliteConnection,
    order: i32,
    report_id: i32,
) -> Result<bool, diesel::result::Error> {
    use crate::schema::reports::dsl::*;
    let rows_affected = diesel::delete(
        reports.filter(id.eq(report_id)).filter(order_id.eq(order)),
    )
    .execute(conn)?;
    Ok(rows_affected > 0)
}
