use std::{
    convert::Infallible,
    future::{Ready, ready},
    ops::{Deref, DerefMut},
};

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use serde::Serialize;

/// The envelope of every successful JSON response.
#[derive(Serialize, Debug)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// Wraps the provided data in a `200 OK` JSON response.
pub fn json<T: Serialize, E>(message: impl Into<String>, data: T) -> Result<HttpResponse, E> {
    Ok(HttpResponse::Ok().json(Envelope {
        success: true,
        message: message.into(),
        data,
        count: None,
    }))
}

/// Wraps the provided rows in a `200 OK` JSON response, along with their count.
pub fn list<T: Serialize, E>(message: impl Into<String>, data: Vec<T>) -> Result<HttpResponse, E> {
    Ok(HttpResponse::Ok().json(Envelope {
        success: true,
        message: message.into(),
        count: Some(data.len()),
        data,
    }))
}

/// Wraps the provided new row in a `201 Created` JSON response.
pub fn created<T: Serialize, E>(message: impl Into<String>, data: T) -> Result<HttpResponse, E> {
    Ok(HttpResponse::Created().json(Envelope {
        success: true,
        message: message.into(),
        data,
        count: None,
    }))
}

/// A resource handler, like [`Data`][d].
///
/// The difference with [`Data`][d] is that it doesn't use an [`Arc`](std::sync::Arc)
/// internally, but the [`Clone`] implementation of the inner type to implement [`FromRequest`].
///
/// [d]: actix_web::web::Data
#[derive(Clone)]
pub struct Res<T>(pub T);

impl<T> From<T> for Res<T> {
    fn from(value: T) -> Self {
        Self(value)
    }
}

impl<T> Deref for Res<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> DerefMut for Res<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<T: Clone + 'static> FromRequest for Res<T> {
    type Error = Infallible;

    type Future = Ready<Result<Self, Infallible>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let data = req
            .app_data::<T>()
            .unwrap_or_else(|| panic!("{} should be present", std::any::type_name::<T>()))
            .clone();
        ready(Ok(Self(data)))
    }
}
