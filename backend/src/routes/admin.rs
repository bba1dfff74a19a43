use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, FromRequest, Multipart, Path, RawQuery, Request, State};
use axum::http::{header, HeaderMap};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::errors::AppError;
use crate::media::UploadFile;
use crate::models::{Account, AccountChanges, Faq, FaqContent, NewAccount, Settings, SettingsChanges, MAX_ACCOUNT_IMAGES};
use crate::routes::extract::{parse_id, session_token, AdminSession, ClientIp};
use crate::services::auth_service::{GateDecision, LoginRejection};
use crate::services::session_store::{cleared_session_cookie, session_cookie};
use crate::services::{catalog_service, faq_service, settings_service};
use crate::state::AppState;
use crate::views::{self, AdminPanel, Deleted};

pub fn router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route("/admin-panel", get(admin_panel))
        .route("/auth-admin", post(auth_admin))
        .route("/logout", post(logout))
        .route(
            "/add-account",
            post(add_account).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/edit-account/:id",
            post(edit_account).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/toggle-status/:id", get(toggle_status))
        .route("/delete-account/:id", get(delete_account))
        .route("/update-settings", post(update_settings))
        .route("/add-faq", post(add_faq))
        .route("/edit-faq/:id", post(edit_faq))
        .route("/delete-faq/:id", get(delete_faq))
}

/// Username and password posted to `/auth-admin`.
#[derive(Debug)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    /// Exactly one `username` and one `password`; any other shape is unreadable.
    pub fn parse(body: &[u8]) -> Option<Self> {
        let mut username = None;
        let mut password = None;
        for (name, value) in url::form_urlencoded::parse(body) {
            let slot = match name.as_ref() {
                "username" => &mut username,
                "password" => &mut password,
                _ => return None,
            };
            if slot.replace(value.into_owned()).is_some() {
                return None;
            }
        }
        Some(Self {
            username: username?,
            password: password?,
        })
    }
}

/// The `key` query parameter. Absent or repeated keys count as no key.
pub fn capability_key(query: Option<&str>) -> Option<String> {
    let mut keys = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(name, _)| name == "key")
        .map(|(_, value)| value.into_owned());
    match (keys.next(), keys.next()) {
        (Some(key), None) => Some(key),
        _ => None,
    }
}

fn panel_location(key: &str) -> String {
    format!(
        "/admin-panel?key={}",
        url::form_urlencoded::byte_serialize(key.as_bytes()).collect::<String>()
    )
}

pub async fn admin_panel(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Result<Response, AppError> {
    info!("GET /admin-panel - Admin panel requested");
    let key = capability_key(query.as_deref());
    let token = session_token(&headers);
    match state.gate.evaluate(key.as_deref(), token.as_deref()) {
        GateDecision::Blocked => {
            warn!("Admin panel refused for {}: bad capability key", ip);
            Err(AppError::Blocked { ip })
        }
        GateDecision::ShowLogin => {
            Ok(Html(views::login_page(&key.unwrap_or_default())).into_response())
        }
        GateDecision::Granted(claims) => {
            let store = state.store.as_ref();
            let panel = AdminPanel {
                admin: claims.sub,
                accounts: catalog_service::list_accounts(store).await?,
                settings: settings_service::get_settings(store).await?,
                faqs: faq_service::list_faqs(store).await?,
            };
            Ok(Json(panel).into_response())
        }
    }
}

/// The key is checked before the body is looked at, so a caller without it
/// only ever sees the blocked page.
pub async fn auth_admin(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    RawQuery(query): RawQuery,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    info!("POST /auth-admin - Admin login attempt from {}", ip);
    let key = capability_key(query.as_deref());
    if !state.gate.key_matches(key.as_deref()) {
        warn!("Login refused for {}: bad capability key", ip);
        return Err(AppError::Blocked { ip });
    }
    let Some(form) = body.ok().and_then(|body| LoginForm::parse(&body)) else {
        warn!("Login refused for {}: unreadable login form", ip);
        return Err(AppError::LoginFailed);
    };

    match state.gate.login(key.as_deref(), &form.username, &form.password) {
        Ok(token) => {
            let cookie = session_cookie(&token, state.gate.sessions().ttl(), state.secure_cookie);
            let location = panel_location(key.as_deref().unwrap_or_default());
            Ok(([(header::SET_COOKIE, cookie)], Redirect::to(&location)).into_response())
        }
        Err(LoginRejection::BadKey) => {
            warn!("Login refused for {}: bad capability key", ip);
            Err(AppError::Blocked { ip })
        }
        Err(LoginRejection::BadCredentials) => {
            warn!("Login refused for {}: bad credentials", ip);
            Err(AppError::LoginFailed)
        }
        Err(LoginRejection::Session(e)) => {
            error!("Failed to issue admin session: {}", e);
            Err(AppError::Internal(e))
        }
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    info!("POST /logout - Ending admin session");
    state.gate.logout(session_token(&headers).as_deref());
    ([(header::SET_COOKIE, cleared_session_cookie())], Redirect::to("/")).into_response()
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Text fields and image parts of an account form.
struct AccountUpload {
    fields: NewAccount,
    files: Vec<UploadFile>,
}

async fn read_account_upload(mut multipart: Multipart) -> Result<AccountUpload, AppError> {
    let mut fields = NewAccount::default();
    let mut files: Vec<UploadFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "images" {
            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?;
            // Browsers send an empty part when no file was chosen.
            if file_name.is_empty() && bytes.is_empty() {
                continue;
            }
            if files.len() == MAX_ACCOUNT_IMAGES {
                return Err(AppError::Validation(format!(
                    "At most {} images per account",
                    MAX_ACCOUNT_IMAGES
                )));
            }
            files.push(UploadFile {
                file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed field {}: {}", name, e)))?;
        let slot = match name.as_str() {
            "title" => &mut fields.title,
            "priceUSD" => &mut fields.price_usd,
            "priceDZ" => &mut fields.price_dz,
            "coins" => &mut fields.coins,
            "gems" => &mut fields.gems,
            other => return Err(AppError::Validation(format!("Unexpected field: {}", other))),
        };
        *slot = non_empty(value);
    }

    Ok(AccountUpload { fields, files })
}

async fn upload_images(state: &AppState, files: Vec<UploadFile>) -> Result<Vec<String>, AppError> {
    let mut image_urls = Vec::with_capacity(files.len());
    for file in files {
        let url = state
            .media
            .upload(file, &state.media_folder)
            .await
            .map_err(|e| {
                error!("Image upload failed: {}", e);
                AppError::Media(e)
            })?;
        image_urls.push(url);
    }
    Ok(image_urls)
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"))
}

pub async fn add_account(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Account>, AppError> {
    info!("POST /add-account - Creating account");
    let upload = read_account_upload(multipart).await?;
    let image_urls = upload_images(&state, upload.files).await?;
    let account = catalog_service::create_account(state.store.as_ref(), upload.fields, image_urls).await?;
    Ok(Json(account))
}

/// Accepts the multipart form (new images replace the stored ones) or a
/// plain urlencoded form for text-only edits.
pub async fn edit_account(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    request: Request,
) -> Result<Json<Account>, AppError> {
    info!("POST /edit-account/{} - Updating account", raw_id);
    let id = parse_id(&raw_id)?;

    let changes = if is_multipart(request.headers()) {
        if state.store.find_account(id).await?.is_none() {
            warn!("Edit requested for missing account {}", id);
            return Err(AppError::NotFound);
        }
        let multipart = Multipart::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(format!("Malformed upload: {}", e)))?;
        let upload = read_account_upload(multipart).await?;
        let images = upload_images(&state, upload.files).await?;
        AccountChanges::from_fields(upload.fields, images)
    } else {
        let Form(changes) = Form::<AccountChanges>::from_request(request, &state)
            .await
            .map_err(|e| AppError::Validation(e.body_text()))?;
        changes
    };

    let account = catalog_service::edit_account(state.store.as_ref(), id, changes).await?;
    Ok(Json(account))
}

pub async fn toggle_status(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Account>, AppError> {
    info!("GET /toggle-status/{} - Flipping status", raw_id);
    let id = parse_id(&raw_id)?;
    let account = catalog_service::toggle_status(state.store.as_ref(), id).await?;
    Ok(Json(account))
}

pub async fn delete_account(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    info!("GET /delete-account/{} - Deleting account", raw_id);
    let id = parse_id(&raw_id)?;
    let deleted = catalog_service::delete_account(state.store.as_ref(), id).await?;
    Ok(Json(Deleted { deleted }))
}

/// Settings as submitted by the admin form. Blank inputs keep the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsForm {
    pub support_link: Option<String>,
    pub mediation_link: Option<String>,
    pub sell_account_link: Option<String>,
    pub buy_now_link: Option<String>,
    pub announcement: Option<String>,
    pub logo_url: Option<String>,
    pub usd_rate: Option<String>,
}

impl SettingsForm {
    pub fn into_changes(self) -> Result<SettingsChanges, AppError> {
        let usd_rate = match self.usd_rate.and_then(non_empty) {
            Some(raw) => Some(
                raw.parse::<f64>()
                    .map_err(|_| AppError::Validation(format!("Invalid USD rate: {}", raw)))?,
            ),
            None => None,
        };
        Ok(SettingsChanges {
            support_link: self.support_link.and_then(non_empty),
            mediation_link: self.mediation_link.and_then(non_empty),
            sell_account_link: self.sell_account_link.and_then(non_empty),
            buy_now_link: self.buy_now_link.and_then(non_empty),
            announcement: self.announcement,
            logo_url: self.logo_url.and_then(non_empty),
            usd_rate,
        })
    }
}

pub async fn update_settings(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> Result<Json<Settings>, AppError> {
    info!("POST /update-settings - Updating settings");
    let changes = form.into_changes()?;
    let settings = settings_service::update_settings(state.store.as_ref(), changes).await?;
    Ok(Json(settings))
}

pub async fn add_faq(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    Form(input): Form<FaqContent>,
) -> Result<Json<Faq>, AppError> {
    info!("POST /add-faq - Creating FAQ");
    let faq = faq_service::create_faq(state.store.as_ref(), input).await?;
    Ok(Json(faq))
}

pub async fn edit_faq(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    Form(content): Form<FaqContent>,
) -> Result<Json<Faq>, AppError> {
    info!("POST /edit-faq/{} - Updating FAQ", raw_id);
    let id = parse_id(&raw_id)?;
    let faq = faq_service::edit_faq(state.store.as_ref(), id, content).await?;
    Ok(Json(faq))
}

pub async fn delete_faq(
    AdminSession(_): AdminSession,
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Deleted>, AppError> {
    info!("GET /delete-faq/{} - Deleting FAQ", raw_id);
    let id = parse_id(&raw_id)?;
    let deleted = faq_service::delete_faq(state.store.as_ref(), id).await?;
    Ok(Json(Deleted { deleted }))
}
