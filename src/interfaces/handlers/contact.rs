use actix_web::{web, HttpRequest, HttpResponse};

use crate::{
    entities::contact::ContactForm, errors::ContactError, utils::client_ip::client_ip,
    AppState,
};

pub async fn submit_contact(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, ContactError> {
    let caller = client_ip(&req, state.trust_forwarded);

    state
        .contact_handler
        .handle_submission(&form, &caller)
        .await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

/// Default service for the contact resource: any verb other than POST.
pub async fn method_not_allowed() -> Result<HttpResponse, ContactError> {
    Err(ContactError::MethodNotAllowed)
}
