use crate::database::{AsyncDbConnection, ChangeEvent, ChangeKind, Database};
use anyhow::Result;
use chrono::Utc;
use rusqlite::types::Value;
use rusqlite::Connection;
use shared_types::{CreateLeadRequest, SourceTable, UpdateLeadRequest};

/// Raw row from the `leads` collection, column names and typing as stored.
#[derive(Debug, Clone, Default)]
pub struct LeadsRow {
    pub id: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
    pub campaign: Option<String>,
    pub service: Option<String>,
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub last_contacted_at: Option<String>,
    pub next_followup_at: Option<String>,
    pub priority: Option<String>,
    pub score: Option<i64>,
}

/// Raw row from the `hire_helper_leads` intake collection. Integer ids,
/// no campaign attribution, free-text `message` and `specific_requirements`.
#[derive(Debug, Clone, Default)]
pub struct HireHelperRow {
    pub id: i64,
    pub created_at: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub source: Option<String>,
    pub service: Option<String>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub specific_requirements: Option<String>,
    pub assigned_to: Option<String>,
    pub notes: Option<String>,
    pub last_contacted_at: Option<String>,
    pub next_followup_at: Option<String>,
    pub priority: Option<String>,
    pub score: Option<i64>,
}

/// Tagged union over the two concrete source shapes. The tag is what routes
/// a later mutation back to the right table.
#[derive(Debug, Clone)]
pub enum RawLeadRow {
    Leads(LeadsRow),
    HireHelper(HireHelperRow),
}

const LEADS_COLUMNS: &str = "id, created_at, updated_at, name, phone, email, city, source, \
     campaign, service, status, assigned_to, notes, last_contacted_at, next_followup_at, \
     priority, score";

const HIRE_COLUMNS: &str = "id, created_at, name, phone, email, city, source, service, status, \
     message, specific_requirements, assigned_to, notes, last_contacted_at, next_followup_at, \
     priority, score";

fn leads_row_from(row: &rusqlite::Row<'_>) -> rusqlite::Result<LeadsRow> {
    Ok(LeadsRow {
        id: row.get(0)?,
        created_at: row.get(1)?,
        updated_at: row.get(2)?,
        name: row.get(3)?,
        phone: row.get(4)?,
        email: row.get(5)?,
        city: row.get(6)?,
        source: row.get(7)?,
        campaign: row.get(8)?,
        service: row.get(9)?,
        status: row.get(10)?,
        assigned_to: row.get(11)?,
        notes: row.get(12)?,
        last_contacted_at: row.get(13)?,
        next_followup_at: row.get(14)?,
        priority: row.get(15)?,
        score: row.get(16)?,
    })
}

fn hire_row_from(row: &rusqlite::Row<'_>) -> rusqlite::Result<HireHelperRow> {
    Ok(HireHelperRow {
        id: row.get(0)?,
        created_at: row.get(1)?,
        name: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        city: row.get(5)?,
        source: row.get(6)?,
        service: row.get(7)?,
        status: row.get(8)?,
        message: row.get(9)?,
        specific_requirements: row.get(10)?,
        assigned_to: row.get(11)?,
        notes: row.get(12)?,
        last_contacted_at: row.get(13)?,
        next_followup_at: row.get(14)?,
        priority: row.get(15)?,
        score: row.get(16)?,
    })
}

async fn fetch_leads_rows(conn: AsyncDbConnection) -> Result<Vec<LeadsRow>> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare(&format!("SELECT {LEADS_COLUMNS} FROM leads"))?;
    let rows = stmt
        .query_map([], |row| leads_row_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

async fn fetch_hire_rows(conn: AsyncDbConnection) -> Result<Vec<HireHelperRow>> {
    let conn = conn.lock().await;
    let mut stmt = conn.prepare(&format!("SELECT {HIRE_COLUMNS} FROM hire_helper_leads"))?;
    let rows = stmt
        .query_map([], |row| hire_row_from(row))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Full window over both collections. The two fetches have no ordering
/// dependency and are joined; either failure fails the aggregate.
pub async fn fetch_all_rows(conn: AsyncDbConnection) -> Result<Vec<RawLeadRow>> {
    let (leads, hire) = tokio::try_join!(
        fetch_leads_rows(conn.clone()),
        fetch_hire_rows(conn.clone())
    )?;

    let mut rows: Vec<RawLeadRow> = leads.into_iter().map(RawLeadRow::Leads).collect();
    rows.extend(hire.into_iter().map(RawLeadRow::HireHelper));
    Ok(rows)
}

pub async fn get_lead_row(conn: AsyncDbConnection, id: &str) -> Result<LeadsRow> {
    let conn = conn.lock().await;
    get_leads_row_sync(&conn, id)
}

fn get_leads_row_sync(conn: &Connection, id: &str) -> Result<LeadsRow> {
    conn.query_row(
        &format!("SELECT {LEADS_COLUMNS} FROM leads WHERE id = ?1"),
        [id],
        |row| leads_row_from(row),
    )
    .map_err(|e| anyhow::anyhow!("Failed to get lead {}: {}", id, e))
}

fn get_hire_row_sync(conn: &Connection, id: i64) -> Result<HireHelperRow> {
    conn.query_row(
        &format!("SELECT {HIRE_COLUMNS} FROM hire_helper_leads WHERE id = ?1"),
        [id],
        |row| hire_row_from(row),
    )
    .map_err(|e| anyhow::anyhow!("Failed to get lead {}: {}", id, e))
}

/// Creates a row in the `leads` collection and returns it as stored.
pub async fn insert_lead(db: &Database, request: &CreateLeadRequest) -> Result<LeadsRow> {
    let row = {
        let conn = db.async_connection.lock().await;
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        conn.execute(
            "INSERT INTO leads
             (id, created_at, name, phone, email, city, source, campaign, service, status,
              priority, assigned_to, notes, next_followup_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rusqlite::params![
                id,
                now,
                request.name,
                request.phone,
                request.email,
                request.city,
                request.source,
                request.campaign,
                request.service_required,
                request.status.unwrap_or_default().as_str(),
                request.priority.unwrap_or_default().as_str(),
                request.assigned_to,
                request.notes,
                request.next_followup_at.map(|t| t.to_rfc3339()),
            ],
        )?;

        get_leads_row_sync(&conn, &id)?
    };

    db.publish_change(ChangeEvent {
        kind: ChangeKind::Insert,
        table: SourceTable::Leads,
        lead: crate::leads::normalize::normalize(RawLeadRow::Leads(row.clone())),
    });

    Ok(row)
}

fn push_set(sets: &mut Vec<String>, values: &mut Vec<Value>, column: &str, value: Value) {
    values.push(value);
    sets.push(format!("{} = ?{}", column, values.len()));
}

fn collect_updates(request: &UpdateLeadRequest, table: SourceTable) -> (Vec<String>, Vec<Value>) {
    let mut sets = Vec::new();
    let mut values = Vec::new();

    let text_fields: [(&str, &Option<String>); 7] = [
        ("name", &request.name),
        ("phone", &request.phone),
        ("email", &request.email),
        ("city", &request.city),
        ("source", &request.source),
        ("assigned_to", &request.assigned_to),
        ("notes", &request.notes),
    ];
    for (column, value) in text_fields {
        if let Some(v) = value {
            push_set(&mut sets, &mut values, column, Value::Text(v.clone()));
        }
    }

    // Campaign attribution only exists on the `leads` collection.
    if table == SourceTable::Leads {
        if let Some(campaign) = &request.campaign {
            push_set(&mut sets, &mut values, "campaign", Value::Text(campaign.clone()));
        }
    }
    if let Some(service) = &request.service_required {
        push_set(&mut sets, &mut values, "service", Value::Text(service.clone()));
    }
    if let Some(status) = request.status {
        push_set(&mut sets, &mut values, "status", Value::Text(status.as_str().to_string()));
    }
    if let Some(priority) = request.priority {
        push_set(&mut sets, &mut values, "priority", Value::Text(priority.as_str().to_string()));
    }
    if let Some(t) = request.last_contacted_at {
        push_set(&mut sets, &mut values, "last_contacted_at", Value::Text(t.to_rfc3339()));
    }
    if let Some(t) = request.next_followup_at {
        push_set(&mut sets, &mut values, "next_followup_at", Value::Text(t.to_rfc3339()));
    }

    if table == SourceTable::Leads {
        push_set(
            &mut sets,
            &mut values,
            "updated_at",
            Value::Text(Utc::now().to_rfc3339()),
        );
    }

    (sets, values)
}

/// Partial update of one row, routed to the table the lead was read from.
/// Returns the updated row re-read from storage.
pub async fn update_lead(
    db: &Database,
    table: SourceTable,
    id: &str,
    request: &UpdateLeadRequest,
) -> Result<RawLeadRow> {
    let row = {
        let conn = db.async_connection.lock().await;
        let (sets, mut values) = collect_updates(request, table);

        if !sets.is_empty() {
            let id_value = match table {
                SourceTable::Leads => Value::Text(id.to_string()),
                SourceTable::HireHelperLeads => Value::Integer(
                    id.parse::<i64>()
                        .map_err(|_| anyhow::anyhow!("Invalid hire_helper_leads id: {}", id))?,
                ),
            };
            values.push(id_value);

            let sql = format!(
                "UPDATE {} SET {} WHERE id = ?{}",
                table.table_name(),
                sets.join(", "),
                values.len()
            );
            let updated = conn.execute(&sql, rusqlite::params_from_iter(values))?;
            if updated == 0 {
                return Err(anyhow::anyhow!("Lead {} not found in {}", id, table.table_name()));
            }
        }

        match table {
            SourceTable::Leads => RawLeadRow::Leads(get_leads_row_sync(&conn, id)?),
            SourceTable::HireHelperLeads => {
                let id = id
                    .parse::<i64>()
                    .map_err(|_| anyhow::anyhow!("Invalid hire_helper_leads id: {}", id))?;
                RawLeadRow::HireHelper(get_hire_row_sync(&conn, id)?)
            }
        }
    };

    db.publish_change(ChangeEvent {
        kind: ChangeKind::Update,
        table,
        lead: crate::leads::normalize::normalize(row.clone()),
    });

    Ok(row)
}
