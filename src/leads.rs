use anyhow::Result;
use chrono::NaiveDate;
use std::fmt;

use column_customizer::{ColumnCatalog, ColumnDefaults, ColumnDescriptor};

pub const LEADS_TABLE: &str = "leads";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeadColumn {
    Name,
    Phone,
    Email,
    Stage,
    Budget,
    Source,
    Agent,
    LastContact,
}

impl LeadColumn {
    pub const ALL: [LeadColumn; 8] = [
        LeadColumn::Name,
        LeadColumn::Phone,
        LeadColumn::Email,
        LeadColumn::Stage,
        LeadColumn::Budget,
        LeadColumn::Source,
        LeadColumn::Agent,
        LeadColumn::LastContact,
    ];

    fn header(&self) -> &'static str {
        match self {
            LeadColumn::Name => "Lead Name",
            LeadColumn::Phone => "Phone",
            LeadColumn::Email => "Email",
            LeadColumn::Stage => "Stage",
            LeadColumn::Budget => "Budget",
            LeadColumn::Source => "Source",
            LeadColumn::Agent => "Agent",
            LeadColumn::LastContact => "Last Contact",
        }
    }
}

impl fmt::Display for LeadColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let key = match self {
            LeadColumn::Name => "name",
            LeadColumn::Phone => "phone",
            LeadColumn::Email => "email",
            LeadColumn::Stage => "stage",
            LeadColumn::Budget => "budget",
            LeadColumn::Source => "source",
            LeadColumn::Agent => "agent",
            LeadColumn::LastContact => "last_contact",
        };
        f.pad(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    New,
    Contacted,
    Viewing,
    Negotiating,
    Closed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Stage::New => "New",
            Stage::Contacted => "Contacted",
            Stage::Viewing => "Viewing",
            Stage::Negotiating => "Negotiating",
            Stage::Closed => "Closed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone)]
pub struct Lead {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub stage: Stage,
    /// Thousands
    pub budget: u32,
    pub source: String,
    pub agent: String,
    pub last_contact: Option<NaiveDate>,
}

pub fn lead_catalog() -> Result<ColumnCatalog<LeadColumn>> {
    ColumnCatalog::new(
        LeadColumn::ALL
            .iter()
            .map(|c| ColumnDescriptor::new(*c, c.header()))
            .collect(),
    )
}

pub fn lead_defaults() -> ColumnDefaults<LeadColumn> {
    let visible = vec![
        LeadColumn::Name,
        LeadColumn::Phone,
        LeadColumn::Stage,
        LeadColumn::Budget,
        LeadColumn::Agent,
    ];
    ColumnDefaults::new(visible.clone(), visible)
}

pub fn render_cell(lead: &Lead, column: &ColumnDescriptor<LeadColumn>) -> String {
    match column.key {
        LeadColumn::Name => lead.name.clone(),
        LeadColumn::Phone => lead.phone.clone(),
        LeadColumn::Email => lead.email.clone(),
        LeadColumn::Stage => lead.stage.to_string(),
        LeadColumn::Budget => format!("${}k", lead.budget),
        LeadColumn::Source => lead.source.clone(),
        LeadColumn::Agent => lead.agent.clone(),
        LeadColumn::LastContact => lead
            .last_contact
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}

pub fn sample_leads() -> Vec<Lead> {
    let rows: [(&str, &str, Stage, u32, &str, &str, Option<(i32, u32, u32)>); 8] = [
        ("Maya Chen", "555-0142", Stage::Viewing, 850, "Referral", "J. Ortiz", Some((2026, 9, 28))),
        ("Omar Haddad", "555-0177", Stage::New, 420, "Website", "L. Brooks", None),
        ("Priya Nair", "555-0103", Stage::Negotiating, 1200, "Open House", "J. Ortiz", Some((2026, 10, 2))),
        ("Tomasz Kowal", "555-0168", Stage::Contacted, 610, "Portal", "R. Singh", Some((2026, 9, 30))),
        ("Grace Adeyemi", "555-0121", Stage::Closed, 975, "Referral", "L. Brooks", Some((2026, 8, 14))),
        ("Luis Romero", "555-0190", Stage::Viewing, 540, "Social", "R. Singh", Some((2026, 10, 5))),
        ("Hana Sato", "555-0135", Stage::New, 300, "Website", "J. Ortiz", None),
        ("Ben Carter", "555-0159", Stage::Contacted, 720, "Portal", "L. Brooks", Some((2026, 10, 1))),
    ];

    rows.iter()
        .map(|(name, phone, stage, budget, source, agent, contact)| Lead {
            name: name.to_string(),
            phone: phone.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            stage: *stage,
            budget: *budget,
            source: source.to_string(),
            agent: agent.to_string(),
            last_contact: contact.and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d)),
        })
        .collect()
}
