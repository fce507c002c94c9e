//! English and Spanish user-facing messages.
//!
//! The request language comes from the first `Accept-Language` tag: `es` (any region)
//! selects Spanish, everything else English. Handlers that produce text take a [`Lang`]
//! extractor and call [`Message::render`].
//!
//! Errors are rendered in English by [`crate::errors::Error`]'s `IntoResponse`, which also
//! attaches the typed [`Message`] to the response extensions. The [`localize_errors`]
//! middleware re-renders that message in the caller's language, so handlers can keep using
//! `?` without threading the language through every call.

use std::convert::Infallible;

use axum::{
    Json,
    extract::{FromRequestParts, Request},
    http::{HeaderMap, header::ACCEPT_LANGUAGE, header::CONTENT_LENGTH, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{errors::ErrorBody, types::Resource};

/// Supported response languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Lang {
    #[default]
    En,
    Es,
}

impl Lang {
    /// Parse an `Accept-Language` value. Quality weights are ignored; only the first tag counts.
    pub fn from_accept_language(value: Option<&str>) -> Self {
        let primary = value
            .and_then(|v| v.split(',').next())
            .and_then(|tag| tag.split(';').next())
            .and_then(|tag| tag.trim().split('-').next())
            .unwrap_or_default();

        if primary.eq_ignore_ascii_case("es") { Lang::Es } else { Lang::En }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::from_accept_language(headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok()))
    }
}

impl<S> FromRequestParts<S> for Lang
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Lang::from_headers(&parts.headers))
    }
}

/// Every user-facing message the API can produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    EmailInUse,
    InvalidCredentials,
    Unauthorized,
    InvalidToken,
    InvalidTokenSubject,
    InvalidEmail,
    PasswordLength { min: usize, max: usize },
    /// Request body is not valid JSON or does not match the expected shape
    InvalidBody { detail: String },

    NotFound(Resource),
    Forbidden(Resource),
    InvalidId(Resource),

    QuotaExceeded { limit: i64 },
    ProjectNameRequired,
    TaskTitleRequired,

    SubscriptionCreated,
    SubscriptionAlreadyActive,
    InvalidPlan,
    PaymentNotCompleted,
    PaymentFailed,

    Internal,
    /// Free text that has no translation (e.g. request body parse errors)
    Untranslated(String),
}

impl Message {
    /// Extra structured field carried next to the text in error bodies
    pub fn limit(&self) -> Option<i64> {
        match self {
            Message::QuotaExceeded { limit } => Some(*limit),
            _ => None,
        }
    }

    pub fn render(&self, lang: Lang) -> String {
        match lang {
            Lang::En => self.render_en(),
            Lang::Es => self.render_es(),
        }
    }

    fn render_en(&self) -> String {
        match self {
            Message::EmailInUse => "Email already in use".to_string(),
            Message::InvalidCredentials => "Invalid credentials".to_string(),
            Message::Unauthorized => "Unauthorized".to_string(),
            Message::InvalidToken => "Invalid token".to_string(),
            Message::InvalidTokenSubject => "Invalid token subject".to_string(),
            Message::InvalidEmail => "Invalid email address".to_string(),
            Message::PasswordLength { min, max } => format!("Password must be between {min} and {max} characters"),
            Message::InvalidBody { detail } => format!("Invalid request body: {detail}"),
            Message::NotFound(resource) => match resource {
                Resource::Plan => "Plan not found".to_string(),
                Resource::Subscription => "Subscription not found".to_string(),
                Resource::Project => "Project not found".to_string(),
                Resource::Task => "Task not found".to_string(),
                Resource::User => "User not found".to_string(),
            },
            Message::Forbidden(resource) => match resource {
                Resource::Subscription => "Forbidden: You do not own this subscription".to_string(),
                Resource::Project => "Forbidden: You do not own this project".to_string(),
                Resource::Task => "Forbidden: You do not own this task".to_string(),
                Resource::Plan | Resource::User => "Forbidden".to_string(),
            },
            Message::InvalidId(resource) => format!("Invalid {} ID", resource.to_string().to_lowercase()),
            Message::QuotaExceeded { limit } => format!("Plan limit reached. Maximum {limit} projects allowed."),
            Message::ProjectNameRequired => "Project name is required".to_string(),
            Message::TaskTitleRequired => "Task title is required".to_string(),
            Message::SubscriptionCreated => "Subscription created successfully".to_string(),
            Message::SubscriptionAlreadyActive => "You already have an active subscription".to_string(),
            Message::InvalidPlan => "Invalid plan".to_string(),
            Message::PaymentNotCompleted => "Payment was not completed".to_string(),
            Message::PaymentFailed => "Payment could not be processed".to_string(),
            Message::Internal => "Internal server error".to_string(),
            Message::Untranslated(text) => text.clone(),
        }
    }

    fn render_es(&self) -> String {
        match self {
            Message::EmailInUse => "El correo electrónico ya está en uso".to_string(),
            Message::InvalidCredentials => "Credenciales inválidas".to_string(),
            Message::Unauthorized => "No autorizado".to_string(),
            Message::InvalidToken => "Token inválido".to_string(),
            Message::InvalidTokenSubject => "Sujeto de token inválido".to_string(),
            Message::InvalidEmail => "Correo electrónico inválido".to_string(),
            Message::PasswordLength { min, max } => format!("La contraseña debe tener entre {min} y {max} caracteres"),
            Message::InvalidBody { detail } => format!("Cuerpo de la solicitud inválido: {detail}"),
            Message::NotFound(resource) => match resource {
                Resource::Plan => "Plan no encontrado".to_string(),
                Resource::Subscription => "Suscripción no encontrada".to_string(),
                Resource::Project => "Proyecto no encontrado".to_string(),
                Resource::Task => "Tarea no encontrada".to_string(),
                Resource::User => "Usuario no encontrado".to_string(),
            },
            Message::Forbidden(resource) => match resource {
                Resource::Subscription => "Prohibido: No eres el propietario de esta suscripción".to_string(),
                Resource::Project => "Prohibido: No eres el propietario de este proyecto".to_string(),
                Resource::Task => "Prohibido: No eres el propietario de esta tarea".to_string(),
                Resource::Plan | Resource::User => "Prohibido".to_string(),
            },
            Message::InvalidId(resource) => match resource {
                Resource::Plan => "ID de plan inválido".to_string(),
                Resource::Subscription => "ID de suscripción inválido".to_string(),
                Resource::Project => "ID de proyecto inválido".to_string(),
                Resource::Task => "ID de tarea inválido".to_string(),
                Resource::User => "ID de usuario inválido".to_string(),
            },
            Message::QuotaExceeded { limit } => format!("Límite del plan alcanzado. Máximo {limit} proyectos permitidos."),
            Message::ProjectNameRequired => "El nombre del proyecto es obligatorio".to_string(),
            Message::TaskTitleRequired => "El título de la tarea es obligatorio".to_string(),
            Message::SubscriptionCreated => "Suscripción creada exitosamente".to_string(),
            Message::SubscriptionAlreadyActive => "Ya tienes una suscripción activa".to_string(),
            Message::InvalidPlan => "Plan inválido".to_string(),
            Message::PaymentNotCompleted => "El pago no se completó".to_string(),
            Message::PaymentFailed => "No se pudo procesar el pago".to_string(),
            Message::Internal => "Error interno del servidor".to_string(),
            Message::Untranslated(text) => text.clone(),
        }
    }
}

/// Localized catalog text for a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanText {
    pub display_name: &'static str,
    pub description: &'static str,
    pub features: [&'static str; 3],
}

/// Catalog text for the plans seeded by migration; `None` for any other plan name.
pub fn plan_text(name: &str, lang: Lang) -> Option<PlanText> {
    let text = match (name, lang) {
        ("free", Lang::En) => PlanText {
            display_name: "Free Plan",
            description: "Get started with up to 3 projects",
            features: ["Up to 3 projects", "Unlimited tasks", "Community support"],
        },
        ("free", Lang::Es) => PlanText {
            display_name: "Plan Gratuito",
            description: "Comienza con hasta 3 proyectos",
            features: ["Hasta 3 proyectos", "Tareas ilimitadas", "Soporte de la comunidad"],
        },
        ("pro", Lang::En) => PlanText {
            display_name: "Pro Plan",
            description: "Grow your team with up to 10 projects",
            features: ["Up to 10 projects", "Unlimited tasks", "Priority email support"],
        },
        ("pro", Lang::Es) => PlanText {
            display_name: "Plan Pro",
            description: "Haz crecer tu equipo con hasta 10 proyectos",
            features: ["Hasta 10 proyectos", "Tareas ilimitadas", "Soporte prioritario por correo"],
        },
        _ => return None,
    };
    Some(text)
}

/// Re-render error bodies in the request's language.
///
/// Only responses carrying a [`Message`] extension are touched; everything else passes
/// through unchanged.
pub async fn localize_errors(lang: Lang, request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let Some(message) = response.extensions_mut().remove::<Message>() else {
        return response;
    };
    if lang == Lang::En {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(CONTENT_LENGTH);
    let (_, body) = Json(ErrorBody::new(&message, lang)).into_response().into_parts();
    Response::from_parts(parts, body)
}
