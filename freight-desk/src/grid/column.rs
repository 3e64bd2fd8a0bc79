//! Column descriptors and per-resource column sets

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Local;
use freight_lib::model::Record;
use freight_lib::model::Resource;
use freight_lib::model::Role;

use super::cell::ACTIONS_FIELD;
use super::cell::STATUS_FIELD;

pub const DEFAULT_MIN_WIDTH: u16 = 150;

/// Custom cell renderer. `None` falls through to the placeholder.
pub type CellRenderer = Arc<dyn Fn(&Record) -> Option<String> + Send + Sync>;

/// Who gets to see a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnAccess {
    #[default]
    Everyone,
    AdminOnly,
    NonAdminOnly,
}

impl ColumnAccess {
    fn allows(self, role: &Role) -> bool {
        match self {
            Self::Everyone => true,
            Self::AdminOnly => *role == Role::Admin,
            Self::NonAdminOnly => *role != Role::Admin,
        }
    }
}

#[derive(Clone)]
pub struct Column {
    pub field: String,
    pub header: String,
    pub min_width: u16,
    pub render: Option<CellRenderer>,
    pub access: ColumnAccess,
    /// Cell edits the row's owner instead of showing a value.
    pub owner_picker: bool,
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("field", &self.field)
            .field("header", &self.header)
            .field("min_width", &self.min_width)
            .field("render", &self.render.is_some())
            .field("access", &self.access)
            .field("owner_picker", &self.owner_picker)
            .finish()
    }
}

impl Column {
    pub fn new(field: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            header: header.into(),
            min_width: DEFAULT_MIN_WIDTH,
            render: None,
            access: ColumnAccess::Everyone,
            owner_picker: false,
        }
    }

    pub fn min_width(mut self, width: u16) -> Self {
        self.min_width = width;
        self
    }

    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Record) -> Option<String> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn access(mut self, access: ColumnAccess) -> Self {
        self.access = access;
        self
    }

    pub fn owner_picker(mut self) -> Self {
        self.owner_picker = true;
        self
    }

    /// Row action buttons. Rendered by the caller.
    pub fn actions() -> Self {
        Self::new(ACTIONS_FIELD, "Действия").min_width(120)
    }

    pub fn is_actions(&self) -> bool {
        self.field == ACTIONS_FIELD
    }

    pub fn is_status(&self) -> bool {
        self.field == STATUS_FIELD
    }
}

/// Ordered columns of one grid.
#[derive(Debug, Clone, Default)]
pub struct ColumnSet {
    columns: Vec<Column>,
}

impl ColumnSet {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Default columns of a resource list, as seen by `role`.
    pub fn for_role(resource: Resource, role: &Role) -> Self {
        let columns = preset(resource)
            .into_iter()
            .filter(|c| c.access.allows(role))
            .collect();
        Self { columns }
    }

    /// Drops columns switched off in `visibility`.
    ///
    /// Missing entries count as visible. The actions column always stays.
    pub fn visible(&self, visibility: &HashMap<String, bool>) -> Self {
        let columns = self
            .columns
            .iter()
            .filter(|c| c.is_actions() || visibility.get(&c.field).copied().unwrap_or(true))
            .cloned()
            .collect();
        Self { columns }
    }

    pub fn get(&self, field: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.field == field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.field.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl IntoIterator for ColumnSet {
    type Item = Column;
    type IntoIter = std::vec::IntoIter<Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.into_iter()
    }
}

fn owner_email(row: &Record) -> Option<String> {
    let owner = row.get_object("created_by").ok().flatten()?;
    owner.display("email")
}

fn owner_columns() -> [Column; 2] {
    [
        Column::new("created_by", "Назначено")
            .min_width(170)
            .render(owner_email)
            .access(ColumnAccess::AdminOnly)
            .owner_picker(),
        Column::new("created_by", "Назначено")
            .min_width(170)
            .render(owner_email)
            .access(ColumnAccess::NonAdminOnly),
    ]
}

fn first_contact(row: &Record) -> Option<String> {
    let contacts = row.get_object("contacts").ok().flatten()?;
    let contact = ["manager", "director"].iter().find_map(|kind| {
        contacts
            .get(kind)
            .and_then(|v| v.as_array())
            .and_then(|list| list.first())
            .and_then(|v| v.as_object())
            .cloned()
    })?;
    let contact = Record::from_map(contact);
    let parts: Vec<String> = ["name", "phone", "email"]
        .iter()
        .filter_map(|f| contact.display(f))
        .collect();
    if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

fn local_timestamp(row: &Record) -> Option<String> {
    let at = row.get_datetime("created_at").ok().flatten()?;
    Some(at.with_timezone(&Local).format("%d.%m.%Y %H:%M").to_string())
}

fn preset(resource: Resource) -> Vec<Column> {
    let mut columns = match resource {
        Resource::Clients => vec![
            Column::new("company_name", "Наименование компании").min_width(200),
            Column::new("business_scope", "Сфера деятельности").min_width(200),
            Column::new("address", "Адрес").min_width(200),
            Column::new("unp", "УНП").min_width(120),
        ],
        Resource::Carriers => vec![
            Column::new("company_name", "Наименование").min_width(200),
            Column::new("working_directions", "Направления").min_width(200),
            Column::new("location", "Местоположение"),
            Column::new("fleet", "Автопарк"),
            Column::new("contacts", "Контакты").min_width(200).render(first_contact),
            Column::new("comments", "Комментарии").min_width(200),
            Column::new("known_rates", "Известные тарифы").min_width(200),
            Column::new("vehicle_number", "Номер ТС").min_width(120),
        ],
        Resource::Cargos => vec![
            Column::new("name", "Наименование").min_width(200),
            Column::new("weight", "Вес (кг)").min_width(120),
            Column::new("volume", "Объем (м³)").min_width(120),
            Column::new("tnved_code", "Код ТН ВЭД"),
            Column::new("cargo_type", "Тип груза"),
            Column::new("transport_conditions", "Условия перевозки").min_width(200),
            Column::new("cargo_value", "Стоимость").min_width(120),
            Column::new("status", "Статус").min_width(120),
        ],
        Resource::Orders => vec![
            Column::new("order_number", "Номер заказа").min_width(120),
            Column::new("contract_number", "Номер договора"),
            Column::new("client_name", "Клиент").min_width(200),
            Column::new("status", "Статус").min_width(120),
            Column::new("loading_date", "Дата загрузки").min_width(120),
            Column::new("total_price", "Сумма").min_width(120),
        ],
        Resource::SiteRequests => vec![
            Column::new("created_at", "Дата").min_width(170).render(local_timestamp),
            Column::new("name", "Имя"),
            Column::new("phone", "Телефон").min_width(140),
            Column::new("email", "Email").min_width(180),
            Column::new("status", "Статус").min_width(120),
        ],
        Resource::Documents => vec![
            Column::new("title", "Название").min_width(200),
            Column::new("document_type", "Тип"),
            Column::new("created_at", "Дата").min_width(170).render(local_timestamp),
        ],
        Resource::Users => vec![
            Column::new("email", "Email").min_width(200),
            Column::new("first_name", "Имя"),
            Column::new("last_name", "Фамилия"),
            Column::new("role", "Роль").min_width(120),
        ],
        Resource::Tasks => vec![
            Column::new("title", "Задача").min_width(200),
            Column::new("status", "Статус").min_width(120),
            Column::new("due_date", "Срок").min_width(120),
        ],
        Resource::Notifications | Resource::CalendarTasks => Vec::new(),
    };

    if resource.has_owner() {
        columns.extend(owner_columns());
    }
    if !columns.is_empty() {
        columns.push(Column::actions());
    }
    columns
}
