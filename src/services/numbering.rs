use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::entities::document_counter;
use crate::errors::ServiceError;

/// Allocates the next document number for `prefix` on `day`, in the form
/// `PREFIX-YYYYMMDD-NNN`.
///
/// The per-(prefix, day) counter row is bumped with a single atomic UPDATE
/// inside the caller's transaction, so concurrent allocations either
/// serialize on the row or fail the whole transaction; a duplicate number
/// can never be produced. The sequence restarts at 1 each day.
pub async fn next_document_number<C>(
    db: &C,
    prefix: &str,
    day: NaiveDate,
) -> Result<String, ServiceError>
where
    C: ConnectionTrait,
{
    let date_key = day.format("%Y%m%d").to_string();

    let bumped = document_counter::Entity::update_many()
        .col_expr(
            document_counter::Column::LastValue,
            Expr::col(document_counter::Column::LastValue).add(1),
        )
        .filter(document_counter::Column::Prefix.eq(prefix))
        .filter(document_counter::Column::DateKey.eq(date_key.as_str()))
        .exec(db)
        .await
        .map_err(ServiceError::db_error)?;

    let sequence = if bumped.rows_affected == 0 {
        // First number of the day for this prefix.
        let counter = document_counter::ActiveModel {
            prefix: Set(prefix.to_string()),
            date_key: Set(date_key.clone()),
            last_value: Set(1),
        };
        document_counter::Entity::insert(counter)
            .exec_without_returning(db)
            .await
            .map_err(ServiceError::db_error)?;
        1
    } else {
        let counter = document_counter::Entity::find_by_id((prefix.to_string(), date_key.clone()))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| {
                ServiceError::InternalError(format!("counter row vanished for {}", prefix))
            })?;
        counter.last_value
    };

    Ok(format_number(prefix, &date_key, sequence))
}

fn format_number(prefix: &str, date_key: &str, sequence: i32) -> String {
    format!("{}-{}-{:03}", prefix, date_key, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn number_format_pads_to_three_digits() {
        assert_eq!(format_number("ENT-ART", "20240115", 7), "ENT-ART-20240115-007");
        assert_eq!(
            format_number("REC-ACT", "20241231", 1042),
            "REC-ACT-20241231-1042"
        );
    }
}
