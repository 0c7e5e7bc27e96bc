//! Admin-managed resources and their generic list/update/delete calls.
//!
//! Each resource is described once by a static `ResourceDescriptor`; the list
//! controller and the admin tabs are driven entirely by it.

use reqwest::multipart::Form;
use serde_json::Value;

use crate::client::{ApiClient, Auth};
use crate::endpoints::segment;
use crate::error::ApiError;
use crate::multipart::text_fields;
use crate::record::Record;
use crate::response::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Users,
    Admins,
    Tickets,
    VisaApplications,
    Matches,
    Predictions,
    Hotels,
    HotelBookings,
    Payments,
}

/// Body encoding of an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Multipart,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub kind: ResourceKind,
    pub title: &'static str,
    /// Singular noun used in toasts ("User updated successfully").
    pub noun: &'static str,
    pub list_path: &'static str,
    /// Prefix of `/{id}` item paths; `None` when no item endpoint exists.
    pub item_path: Option<&'static str>,
    pub fixed_query: &'static [(&'static str, &'static str)],
    /// `None` when the backend has no update endpoint.
    pub update: Option<Encoding>,
    pub delete: bool,
    pub list_auth: Auth,
    pub status_options: &'static [&'static str],
    pub role_options: &'static [&'static str],
}

impl ResourceDescriptor {
    pub fn supports_update(&self) -> bool {
        self.update.is_some() && self.item_path.is_some()
    }

    pub fn supports_delete(&self) -> bool {
        self.delete && self.item_path.is_some()
    }
}

static USERS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Users,
    title: "Users",
    noun: "User",
    list_path: "/users/get-all-users",
    item_path: Some("/users"),
    fixed_query: &[],
    update: Some(Encoding::Json),
    delete: true,
    list_auth: Auth::Bearer,
    status_options: &["active", "suspended"],
    role_options: &["user", "admin", "receptionist"],
};

static ADMINS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Admins,
    title: "Admins",
    noun: "Admin",
    list_path: "/users/get-all-users",
    item_path: Some("/users"),
    fixed_query: &[("role", "admin")],
    update: Some(Encoding::Json),
    delete: true,
    list_auth: Auth::Bearer,
    status_options: &["active", "suspended"],
    role_options: &["user", "admin"],
};

static TICKETS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Tickets,
    title: "Tickets",
    noun: "Ticket",
    list_path: "/tickets/all",
    item_path: Some("/tickets"),
    fixed_query: &[],
    update: None,
    delete: true,
    list_auth: Auth::Bearer,
    status_options: &["Redeemed", "Pending", "Expired"],
    role_options: &[],
};

static VISA_APPLICATIONS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::VisaApplications,
    title: "Visa Applications",
    noun: "Visa application",
    list_path: "/visa-applications/get-visa-applications",
    item_path: Some("/visa-applications"),
    fixed_query: &[],
    update: Some(Encoding::Json),
    delete: true,
    list_auth: Auth::Bearer,
    status_options: &["pending", "approved", "rejected"],
    role_options: &[],
};

static MATCHES: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Matches,
    title: "Matches",
    noun: "Match",
    list_path: "/worldcup/matches",
    item_path: Some("/worldcup/matches"),
    fixed_query: &[],
    update: Some(Encoding::Multipart),
    delete: true,
    list_auth: Auth::Optional,
    status_options: &["scheduled", "live", "completed", "cancelled"],
    role_options: &[],
};

static PREDICTIONS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Predictions,
    title: "Predictions",
    noun: "Prediction",
    list_path: "/worldcup/predictions/all",
    item_path: Some("/worldcup/predictions"),
    fixed_query: &[],
    update: None,
    delete: true,
    list_auth: Auth::Bearer,
    status_options: &[],
    role_options: &[],
};

static HOTELS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Hotels,
    title: "Hotels",
    noun: "Hotel",
    list_path: "/hotels",
    item_path: Some("/hotels"),
    fixed_query: &[],
    update: Some(Encoding::Multipart),
    delete: true,
    list_auth: Auth::Optional,
    status_options: &[],
    role_options: &[],
};

static HOTEL_BOOKINGS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::HotelBookings,
    title: "Bookings",
    noun: "Booking",
    list_path: "/hotels/bookings/all",
    item_path: None,
    fixed_query: &[],
    update: None,
    delete: false,
    list_auth: Auth::Bearer,
    status_options: &["confirmed", "pending"],
    role_options: &[],
};

static PAYMENTS: ResourceDescriptor = ResourceDescriptor {
    kind: ResourceKind::Payments,
    title: "Payments",
    noun: "Payment",
    list_path: "/hotels/transactions/all",
    item_path: None,
    fixed_query: &[],
    update: None,
    delete: false,
    list_auth: Auth::Bearer,
    status_options: &[],
    role_options: &[],
};

impl ResourceKind {
    pub const ALL: [ResourceKind; 9] = [
        ResourceKind::Users,
        ResourceKind::Admins,
        ResourceKind::Tickets,
        ResourceKind::VisaApplications,
        ResourceKind::Matches,
        ResourceKind::Predictions,
        ResourceKind::Hotels,
        ResourceKind::HotelBookings,
        ResourceKind::Payments,
    ];

    pub fn descriptor(self) -> &'static ResourceDescriptor {
        match self {
            ResourceKind::Users => &USERS,
            ResourceKind::Admins => &ADMINS,
            ResourceKind::Tickets => &TICKETS,
            ResourceKind::VisaApplications => &VISA_APPLICATIONS,
            ResourceKind::Matches => &MATCHES,
            ResourceKind::Predictions => &PREDICTIONS,
            ResourceKind::Hotels => &HOTELS,
            ResourceKind::HotelBookings => &HOTEL_BOOKINGS,
            ResourceKind::Payments => &PAYMENTS,
        }
    }
}

impl ApiClient {
    fn item_url(&self, desc: &ResourceDescriptor, id: &str) -> Result<String, ApiError> {
        let prefix = desc.item_path.ok_or_else(|| {
            ApiError::InvalidRequest(format!("{} has no item endpoint", desc.title))
        })?;
        Ok(self.endpoints().url(&format!("{prefix}/{}", segment(id))))
    }

    /// Fetches one page. Empty filter values are left out of the query.
    pub async fn list_resource(
        &self,
        desc: &ResourceDescriptor,
        page: u32,
        limit: u32,
        filters: &[(String, String)],
    ) -> Result<Page<Record>, ApiError> {
        let mut query: Vec<(String, String)> = vec![
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        query.extend(
            desc.fixed_query
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        query.extend(
            filters
                .iter()
                .filter(|(_, v)| !v.trim().is_empty())
                .cloned(),
        );

        let url = self.endpoints().url(desc.list_path);
        let page: Page<Record> = self.get_json(&url, &query, desc.list_auth).await?;
        tracing::debug!(
            resource = desc.title,
            page = page.page,
            total_pages = page.total_pages,
            items = page.docs.len(),
            "fetched page"
        );
        Ok(page)
    }

    /// PUTs the record keyed by its `id`; the `id` field itself is not sent.
    pub async fn update_resource(
        &self,
        desc: &ResourceDescriptor,
        record: &Record,
    ) -> Result<Value, ApiError> {
        let encoding = desc.update.ok_or_else(|| {
            ApiError::InvalidRequest(format!("{} cannot be edited", desc.title))
        })?;
        let id = record
            .id()
            .ok_or_else(|| ApiError::InvalidRequest("record has no id".to_string()))?;
        let url = self.item_url(desc, &id)?;
        let body = record.without(&["id"]);

        match encoding {
            Encoding::Json => self.put_json(&url, &body, Auth::Bearer).await,
            Encoding::Multipart => {
                let form = text_fields(Form::new(), body.as_map());
                self.put_multipart(&url, form, Auth::Bearer).await
            }
        }
    }

    pub async fn delete_resource(&self, desc: &ResourceDescriptor, id: &str) -> Result<(), ApiError> {
        if !desc.delete {
            return Err(ApiError::InvalidRequest(format!(
                "{} cannot be deleted",
                desc.title
            )));
        }
        let url = self.item_url(desc, id)?;
        self.delete(&url, Auth::Bearer).await
    }
}
