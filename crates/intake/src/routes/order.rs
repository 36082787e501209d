//! Order form route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cadia_core::Color;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb};
use crate::feedback::Feedback;
use crate::filters;
use crate::routes::collect::{ACCEPTED_EXTENSION, CollectedForm, FILE_FIELD, FormValues};
use crate::services::submit_order;
use crate::state::AppState;

/// One entry of the material color dropdown.
#[derive(Debug, Clone)]
pub struct ColorOption {
    pub label: &'static str,
    pub selected: bool,
}

fn color_options(selected: &str) -> Vec<ColorOption> {
    Color::ALL
        .into_iter()
        .map(|color| ColorOption {
            label: color.label(),
            selected: color.label().eq_ignore_ascii_case(selected.trim()),
        })
        .collect()
}

/// The order page: form, feedback from the last post, and footer.
#[derive(Template, WebTemplate)]
#[template(path = "order/form.html")]
pub struct OrderPageTemplate {
    pub company_name: String,
    pub support_email: String,
    pub show_test_banner: bool,
    pub accepted_extension: &'static str,
    pub file_field: &'static str,
    pub form: FormValues,
    pub colors: Vec<ColorOption>,
    pub feedback: Feedback,
}

impl OrderPageTemplate {
    fn new(state: &AppState, form: FormValues, feedback: Feedback) -> Self {
        let branding = &state.config().branding;
        let colors = color_options(&form.color);
        Self {
            company_name: branding.company_name.clone(),
            support_email: branding.support_email.to_string(),
            show_test_banner: branding.show_test_banner,
            accepted_extension: ACCEPTED_EXTENSION,
            file_field: FILE_FIELD,
            form,
            colors,
            feedback,
        }
    }
}

/// Display the empty order form.
///
/// GET /
#[instrument(skip(state))]
pub async fn form_page(State(state): State<AppState>) -> impl IntoResponse {
    OrderPageTemplate::new(&state, FormValues::default(), Feedback::default())
}

/// Submit an order.
///
/// POST /orders
///
/// Re-renders the order page with the outcome: the filled-in form and an
/// error on rejection, a blocking error when the order could not be stored,
/// or the confirmation and summary on success.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response> {
    let form = CollectedForm::read(&mut multipart).await?;
    let file_name = form
        .file
        .as_ref()
        .map_or("<none>", |file| file.file_name())
        .to_string();
    add_breadcrumb(
        "order",
        "Order form submitted",
        Some(&[("file", file_name.as_str())]),
    );

    let (values, submission) = form.into_submission();

    let submission = match submission {
        Ok(submission) => submission,
        Err(err) => {
            tracing::info!(error = %err, "Order form rejected during collection");
            let page = OrderPageTemplate::new(&state, values, state.feedback().collection_failed(&err));
            return Ok((StatusCode::UNPROCESSABLE_ENTITY, page).into_response());
        }
    };

    let submitted_at = chrono::Local::now().naive_local();
    let outcome = submit_order(
        state.store(),
        state.notifier(),
        submission,
        state.validation_policy(),
        submitted_at,
    )
    .await;

    let status = outcome.status_code();
    let feedback = state.feedback().render(&outcome);
    // A stored order starts a fresh form; anything else keeps the input.
    let values = if outcome.is_done() {
        FormValues::default()
    } else {
        values
    };

    Ok((status, OrderPageTemplate::new(&state, values, feedback)).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_options_mark_selection() {
        let options = color_options("blue");
        assert_eq!(options.len(), Color::ALL.len());
        let selected: Vec<_> = options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label, "Blue");
    }

    #[test]
    fn test_color_options_unknown_selects_nothing() {
        assert!(color_options("Plaid").iter().all(|o| !o.selected));
    }
}
