//! Order form field collection.
//!
//! Reads the `multipart/form-data` post of the order form into raw values,
//! then turns them into an [`OrderSubmission`]. Collection only enforces what
//! the form widgets themselves enforce (accepted file type, numeric quantity,
//! a listed color); everything else is the validator's job.

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use cadia_core::{
    Color, ColorParseError, Customer, OrderSubmission, Quantity, QuantityError,
    ShippingAddress, UploadedFile,
};
use thiserror::Error;

/// The only design file extension the form accepts.
pub const ACCEPTED_EXTENSION: &str = "step";

/// Name of the file input on the order form.
pub const FILE_FIELD: &str = "design_file";

/// A form value the widgets should have prevented.
#[derive(Debug, Error)]
pub enum CollectError {
    #[error("unsupported design file type: {0}")]
    UnsupportedFileType(String),

    #[error("invalid quantity: {0}")]
    InvalidQuantity(#[from] QuantityError),

    #[error(transparent)]
    UnknownColor(#[from] ColorParseError),
}

/// Text values of the order form, kept verbatim so a rejected form can be
/// shown again as the customer typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub color: String,
    pub custom_color: String,
    pub quantity: String,
    pub special_instructions: String,
    pub terms: bool,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address_line1: String::new(),
            address_line2: String::new(),
            city: String::new(),
            state: String::new(),
            zip: String::new(),
            country: String::new(),
            color: Color::default().label().to_string(),
            custom_color: String::new(),
            quantity: Quantity::default().to_string(),
            special_instructions: String::new(),
            terms: false,
        }
    }
}

impl FormValues {
    /// Store one text field by its form name. Unknown names are ignored.
    fn set(&mut self, name: &str, value: String) {
        let slot = match name {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address_line1" => &mut self.address_line1,
            "address_line2" => &mut self.address_line2,
            "city" => &mut self.city,
            "state" => &mut self.state,
            "zip" => &mut self.zip,
            "country" => &mut self.country,
            "color" => &mut self.color,
            "custom_color" => &mut self.custom_color,
            "quantity" => &mut self.quantity,
            "special_instructions" => &mut self.special_instructions,
            "terms" => {
                self.terms = true;
                return;
            }
            _ => return,
        };
        *slot = value;
    }
}

/// Raw order form as posted.
#[derive(Debug, Default)]
pub struct CollectedForm {
    pub values: FormValues,
    pub file: Option<UploadedFile>,
}

impl CollectedForm {
    /// Read every part of the multipart body.
    ///
    /// # Errors
    ///
    /// Returns the multipart error if the body is malformed or exceeds the
    /// configured size limit.
    pub async fn read(multipart: &mut Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if name == FILE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content = field.bytes().await?;
                // Browsers send an empty part when no file was chosen.
                form.file = UploadedFile::new(&file_name, content.to_vec());
                continue;
            }

            let value = field.text().await?;
            form.values.set(&name, value);
        }

        Ok(form)
    }

    /// Convert the raw form into a submission. The raw values are returned
    /// alongside for re-rendering the form.
    #[must_use]
    pub fn into_submission(self) -> (FormValues, Result<OrderSubmission, CollectError>) {
        let submission = build_submission(&self.values, self.file);
        (self.values, submission)
    }
}

fn non_empty(value: &str) -> Option<String> {
    Some(value).filter(|v| !v.trim().is_empty()).map(String::from)
}

fn build_submission(
    values: &FormValues,
    file: Option<UploadedFile>,
) -> Result<OrderSubmission, CollectError> {
    if let Some(file) = &file {
        if file.extension().as_deref() != Some(ACCEPTED_EXTENSION) {
            return Err(CollectError::UnsupportedFileType(file.file_name().to_string()));
        }
    }

    let color: Color = values.color.parse()?;
    let quantity: Quantity = values.quantity.parse()?;

    Ok(OrderSubmission {
        customer: Customer {
            name: values.name.clone(),
            email: values.email.clone(),
            phone: values.phone.clone(),
        },
        address: ShippingAddress {
            line1: values.address_line1.clone(),
            line2: non_empty(&values.address_line2),
            city: values.city.clone(),
            state: values.state.clone(),
            zip: values.zip.clone(),
            country: values.country.clone(),
        },
        color,
        custom_color: non_empty(&values.custom_color),
        quantity,
        special_instructions: values.special_instructions.clone(),
        file,
        terms_accepted: values.terms,
    })
}
