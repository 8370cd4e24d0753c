use crate::config::Credentials;
use crate::error::AuthError;
use crate::parsers::resolve_url;
use scraper::{ElementRef, Html, Selector};

pub const USERNAME_FIELD: &str = "#Email";
pub const PASSWORD_FIELD: &str = "#Password";
pub const SUBMIT_CONTROL: &str = "#signInButton";

/// A filled-in sign-in form, ready to be submitted.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

fn compile(css: &'static str) -> Result<Selector, AuthError> {
    Selector::parse(css).map_err(|_| AuthError::LoginFormMissing(css.to_string()))
}

/// Whether the page still presents the username field of the sign-in form.
pub fn has_login_form(html: &str) -> bool {
    let Ok(username) = Selector::parse(USERNAME_FIELD) else {
        return false;
    };
    Html::parse_document(html).select(&username).next().is_some()
}

/// Finds the sign-in form on `html` (served from `page_url`) and fills in the credentials.
///
/// Hidden inputs of the form, such as anti-forgery tokens, are carried over unchanged.
pub fn parse_login_form(
    html: &str,
    page_url: &str,
    credentials: &Credentials,
) -> Result<LoginForm, AuthError> {
    let document = Html::parse_document(html);

    let username_sel = compile(USERNAME_FIELD)?;
    let password_sel = compile(PASSWORD_FIELD)?;
    let submit_sel = compile(SUBMIT_CONTROL)?;
    let hidden_sel = compile("input[type=\"hidden\"]")?;

    let username = document
        .select(&username_sel)
        .next()
        .ok_or_else(|| AuthError::LoginFormMissing(USERNAME_FIELD.to_string()))?;
    let password = document
        .select(&password_sel)
        .next()
        .ok_or_else(|| AuthError::LoginFormMissing(PASSWORD_FIELD.to_string()))?;
    let submit = document
        .select(&submit_sel)
        .next()
        .ok_or_else(|| AuthError::LoginFormMissing(SUBMIT_CONTROL.to_string()))?;

    let form = username
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "form");

    let action = form
        .and_then(|f| f.value().attr("action"))
        .filter(|a| !a.trim().is_empty())
        .and_then(|a| resolve_url(page_url, a))
        .unwrap_or_else(|| page_url.to_string());

    let mut fields = Vec::new();
    if let Some(form) = form {
        for input in form.select(&hidden_sel) {
            if let Some(name) = input.value().attr("name") {
                let value = input.value().attr("value").unwrap_or_default();
                fields.push((name.to_string(), value.to_string()));
            }
        }
    }

    fields.push((
        username.value().attr("name").unwrap_or("Email").to_string(),
        credentials.username.clone(),
    ));
    fields.push((
        password.value().attr("name").unwrap_or("Password").to_string(),
        credentials.password.clone(),
    ));
    if let Some(name) = submit.value().attr("name") {
        let value = submit.value().attr("value").unwrap_or_default();
        fields.push((name.to_string(), value.to_string()));
    }

    Ok(LoginForm { action, fields })
}
