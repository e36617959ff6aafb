//! Add-medicine form with company and location autocomplete.

use super::{required, CatalogBackend, FormMessage, ValidationError};
use crate::api::{ApiError, ApiResult};
use crate::models::{Item, NewItem};

pub const ADD_SUCCESS_MESSAGE: &str = "Medicine added successfully!";
pub const ADD_FAILED_MESSAGE: &str = "Failed to add medicine";
pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please try again.";

/// State of the add-medicine screen.
///
/// Company and location inputs double as autocomplete search boxes over the
/// lists loaded from the backend. Typing a value that is not in the list is
/// allowed and creates a new company or location on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MedicineForm {
    fields: NewItem,
    company_search: String,
    location_search: String,
    show_company_dropdown: bool,
    show_location_dropdown: bool,
    companies: Vec<String>,
    locations: Vec<String>,
    loading: bool,
    message: Option<FormMessage>,
}

impl MedicineForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn fields(&self) -> &NewItem {
        &self.fields
    }

    pub const fn loading(&self) -> bool {
        self.loading
    }

    pub const fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.fields.name = value.into();
    }

    pub fn company_search(&self) -> &str {
        &self.company_search
    }

    pub fn location_search(&self) -> &str {
        &self.location_search
    }

    /// Typing in the company box also sets the company field.
    pub fn company_input(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.show_company_dropdown = !value.is_empty();
        self.fields.company.clone_from(&value);
        self.company_search = value;
    }

    pub fn location_input(&mut self, value: impl Into<String>) {
        let value = value.into();
        self.show_location_dropdown = !value.is_empty();
        self.fields.location.clone_from(&value);
        self.location_search = value;
    }

    pub fn select_company(&mut self, company: impl Into<String>) {
        let company = company.into();
        self.fields.company.clone_from(&company);
        self.company_search = company;
        self.show_company_dropdown = false;
    }

    pub fn select_location(&mut self, location: impl Into<String>) {
        let location = location.into();
        self.fields.location.clone_from(&location);
        self.location_search = location;
        self.show_location_dropdown = false;
    }

    /// Known companies containing the search text, case-insensitively.
    pub fn filtered_companies(&self) -> Vec<&str> {
        filter_candidates(&self.companies, &self.company_search)
    }

    pub fn filtered_locations(&self) -> Vec<&str> {
        filter_candidates(&self.locations, &self.location_search)
    }

    /// The dropdown shows only while typing and when something matches.
    pub fn company_dropdown_visible(&self) -> bool {
        self.show_company_dropdown && !self.filtered_companies().is_empty()
    }

    pub fn location_dropdown_visible(&self) -> bool {
        self.show_location_dropdown && !self.filtered_locations().is_empty()
    }

    /// Pointer-down outside both autocomplete boxes.
    pub fn dismiss_dropdowns(&mut self) {
        self.show_company_dropdown = false;
        self.show_location_dropdown = false;
    }

    /// Reset every field and dropdown. Loaded lists and the message stay.
    pub fn clear(&mut self) {
        self.fields = NewItem::default();
        self.company_search.clear();
        self.location_search.clear();
        self.dismiss_dropdowns();
    }

    /// Load both candidate lists. Failures are logged and leave a list empty.
    pub async fn load_catalog<B: CatalogBackend>(&mut self, backend: &B) {
        self.companies = match backend.list_companies().await {
            Ok(companies) => companies,
            Err(error) => {
                tracing::error!("Error fetching companies: {}", error);
                Vec::new()
            }
        };
        self.locations = match backend.list_locations().await {
            Ok(locations) => locations,
            Err(error) => {
                tracing::error!("Error fetching locations: {}", error);
                Vec::new()
            }
        };
    }

    /// Check that all three fields are filled and return the trimmed payload.
    pub fn validate(&self) -> Result<NewItem, ValidationError> {
        Ok(NewItem {
            name: required(&self.fields.name, "Medicine name")?,
            company: required(&self.fields.company, "Company")?,
            location: required(&self.fields.location, "Location")?,
        })
    }

    /// Submit the form and return the message now shown to the user.
    pub async fn submit<B: CatalogBackend>(&mut self, backend: &B) -> FormMessage {
        let item = match self.begin_submit() {
            Ok(item) => item,
            Err(message) => return message,
        };
        let result = backend.create_item(&item).await;
        self.finish_submit(backend, result).await
    }

    /// Validate and mark the form as loading.
    ///
    /// Returns the payload to send, or the validation message now shown.
    /// The form stays loading until [`Self::finish_submit`] is called.
    pub fn begin_submit(&mut self) -> Result<NewItem, FormMessage> {
        self.message = None;
        match self.validate() {
            Ok(item) => {
                self.loading = true;
                Ok(item)
            }
            Err(error) => Err(self.show(FormMessage::danger(error.to_string()))),
        }
    }

    /// Apply the create result and clear the loading flag.
    pub async fn finish_submit<B: CatalogBackend>(
        &mut self,
        backend: &B,
        result: ApiResult<Option<Item>>,
    ) -> FormMessage {
        self.loading = false;
        match result {
            Ok(_) => {
                self.clear();
                self.load_catalog(backend).await;
                self.show(FormMessage::success(ADD_SUCCESS_MESSAGE))
            }
            Err(ApiError::Status { status, message }) => {
                tracing::warn!("Adding medicine rejected with HTTP {}", status);
                let text = message.unwrap_or_else(|| ADD_FAILED_MESSAGE.to_string());
                self.show(FormMessage::danger(text))
            }
            Err(error) => {
                tracing::error!("Error adding medicine: {}", error);
                self.show(FormMessage::danger(NETWORK_ERROR_MESSAGE))
            }
        }
    }

    fn show(&mut self, message: FormMessage) -> FormMessage {
        self.message = Some(message.clone());
        message
    }
}

fn filter_candidates<'a>(candidates: &'a [String], search: &str) -> Vec<&'a str> {
    let needle = search.to_lowercase();
    candidates
        .iter()
        .filter(|candidate| !candidate.is_empty() && candidate.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::forms::MessageKind;

    #[derive(Default)]
    struct FakeCatalog {
        companies: Vec<String>,
        locations: Vec<String>,
        create_status: Option<(u16, Option<String>)>,
        network_down: bool,
        created: Mutex<Vec<NewItem>>,
        list_calls: AtomicUsize,
    }

    impl CatalogBackend for FakeCatalog {
        fn list_companies(&self) -> impl Future<Output = ApiResult<Vec<String>>> + Send {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            let companies = self.companies.clone();
            async move { Ok(companies) }
        }

        fn list_locations(&self) -> impl Future<Output = ApiResult<Vec<String>>> + Send {
            let locations = self.locations.clone();
            let down = self.network_down;
            async move {
                if down {
                    Err(ApiError::MalformedPayload("offline".to_string()))
                } else {
                    Ok(locations)
                }
            }
        }

        fn create_item(
            &self,
            item: &NewItem,
        ) -> impl Future<Output = ApiResult<Option<Item>>> + Send {
            self.created.lock().unwrap().push(item.clone());
            let status = self.create_status.clone();
            let down = self.network_down;
            async move {
                if down {
                    return Err(ApiError::MalformedPayload("offline".to_string()));
                }
                match status {
                    Some((status, message)) => Err(ApiError::Status { status, message }),
                    None => Ok(None),
                }
            }
        }
    }

    fn catalog() -> FakeCatalog {
        FakeCatalog {
            companies: vec!["Acme Pharma".to_string(), "Bayer".to_string()],
            locations: vec!["Shelf A1".to_string(), "Fridge 2".to_string()],
            ..FakeCatalog::default()
        }
    }

    fn filled_form() -> MedicineForm {
        let mut form = MedicineForm::new();
        form.set_name("Ibuprofen");
        form.select_company("Acme Pharma");
        form.select_location("Shelf A1");
        form
    }

    #[tokio::test]
    async fn company_search_filters_case_insensitively() {
        let backend = catalog();
        let mut form = MedicineForm::new();
        form.load_catalog(&backend).await;

        form.company_input("ACME");
        assert_eq!(form.filtered_companies(), vec!["Acme Pharma"]);
        assert!(form.company_dropdown_visible());
        assert_eq!(form.fields().company, "ACME");

        form.company_input("zzz");
        assert!(form.filtered_companies().is_empty());
        assert!(!form.company_dropdown_visible());

        form.company_input("");
        assert!(!form.company_dropdown_visible());
    }

    #[tokio::test]
    async fn selecting_candidate_sets_field_and_hides_dropdown() {
        let backend = catalog();
        let mut form = MedicineForm::new();
        form.load_catalog(&backend).await;

        form.location_input("fri");
        assert!(form.location_dropdown_visible());
        form.select_location("Fridge 2");
        assert_eq!(form.fields().location, "Fridge 2");
        assert_eq!(form.location_search(), "Fridge 2");
        assert!(!form.location_dropdown_visible());
    }

    #[tokio::test]
    async fn outside_click_hides_both_dropdowns() {
        let backend = catalog();
        let mut form = MedicineForm::new();
        form.load_catalog(&backend).await;

        form.company_input("a");
        form.location_input("a");
        form.dismiss_dropdowns();
        assert!(!form.company_dropdown_visible());
        assert!(!form.location_dropdown_visible());
        assert_eq!(form.company_search(), "a");
    }

    #[tokio::test]
    async fn missing_field_blocks_submission() {
        let backend = catalog();
        let mut form = filled_form();
        form.set_name("   ");

        let message = form.submit(&backend).await;
        assert_eq!(message, FormMessage::danger("Medicine name is required."));
        assert!(backend.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_submit_resets_form_and_refreshes_lists() {
        let backend = catalog();
        let mut form = filled_form();
        form.set_name("  Ibuprofen ");

        let message = form.submit(&backend).await;
        assert_eq!(message, FormMessage::success(ADD_SUCCESS_MESSAGE));
        assert_eq!(
            backend.created.lock().unwrap().clone(),
            vec![NewItem {
                name: "Ibuprofen".to_string(),
                company: "Acme Pharma".to_string(),
                location: "Shelf A1".to_string(),
            }]
        );
        assert_eq!(form.fields(), &NewItem::default());
        assert_eq!(form.company_search(), "");
        assert_eq!(backend.list_calls.load(Ordering::SeqCst), 1);
        assert!(!form.loading());
    }

    #[tokio::test]
    async fn form_reports_loading_while_create_is_outstanding() {
        let backend = catalog();
        let mut form = filled_form();
        assert!(!form.loading());

        let item = form.begin_submit().unwrap();
        assert!(form.loading());
        assert_eq!(form.message(), None);

        let result = backend.create_item(&item).await;
        let message = form.finish_submit(&backend, result).await;
        assert!(!form.loading());
        assert_eq!(message, FormMessage::success(ADD_SUCCESS_MESSAGE));
    }

    #[tokio::test]
    async fn invalid_form_never_enters_loading() {
        let mut form = filled_form();
        form.select_location("");

        let message = form.begin_submit().unwrap_err();
        assert_eq!(message, FormMessage::danger("Location is required."));
        assert!(!form.loading());
        assert_eq!(form.message(), Some(&message));
    }

    #[tokio::test]
    async fn server_rejection_shows_server_message_or_fallback() {
        let backend = FakeCatalog {
            create_status: Some((409, Some("Medicine already exists".to_string()))),
            ..catalog()
        };
        let mut form = filled_form();
        let message = form.submit(&backend).await;
        assert_eq!(message.kind, MessageKind::Danger);
        assert_eq!(message.text, "Medicine already exists");
        assert_eq!(form.fields().name, "Ibuprofen");

        let backend = FakeCatalog {
            create_status: Some((500, None)),
            ..catalog()
        };
        let message = form.submit(&backend).await;
        assert_eq!(message.text, ADD_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn transport_failure_shows_network_error() {
        let backend = FakeCatalog {
            network_down: true,
            ..catalog()
        };
        let mut form = filled_form();
        let message = form.submit(&backend).await;
        assert_eq!(message, FormMessage::danger(NETWORK_ERROR_MESSAGE));
        assert_eq!(form.message(), Some(&message));
    }

    #[tokio::test]
    async fn failed_list_load_leaves_list_empty() {
        let backend = FakeCatalog {
            network_down: true,
            ..catalog()
        };
        let mut form = MedicineForm::new();
        form.load_catalog(&backend).await;
        form.location_input("a");
        assert!(form.filtered_locations().is_empty());
        form.company_input("a");
        assert_eq!(form.filtered_companies().len(), 2);
    }
}
