//! Turns raw path segments and query parameters into a [`ResolvedRequest`].
//!
//! Path segments are lowercased before they are compared with the catalog.
//! Entries of the `ignore` and `eps` lists are used verbatim, so
//! `?eps=Waifu` never matches while `/SFW/WAIFU` does.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::{
    error::{AppError, AppResult},
    models::{Category, ResolvedRequest},
    services::catalog::is_valid_endpoint,
};

pub const RANDOM_ENDPOINT: &str = "random";

/// Resolve `/{type}/{endpoint}`, falling back to a random pick when the
/// endpoint is the literal `random`.
pub fn resolve_path<R: Rng + ?Sized>(
    type_param: &str,
    endpoint_param: &str,
    ignore: Option<&str>,
    rng: &mut R,
) -> AppResult<ResolvedRequest> {
    let type_param = type_param.to_lowercase();
    let endpoint_param = endpoint_param.to_lowercase();

    if let Some(category) = Category::parse(&type_param).filter(|c| c.contains(&endpoint_param)) {
        return Ok(ResolvedRequest::new(category, endpoint_param));
    }

    if endpoint_param == RANDOM_ENDPOINT {
        return resolve_random(&type_param, ignore, rng);
    }

    Err(AppError::BadEndpoint)
}

/// Pick any catalog endpoint of the category that is not listed in `ignore`.
pub fn resolve_random<R: Rng + ?Sized>(
    type_param: &str,
    ignore: Option<&str>,
    rng: &mut R,
) -> AppResult<ResolvedRequest> {
    let category = Category::parse(type_param).ok_or(AppError::BadType)?;
    let endpoints = category.endpoints();

    let candidates: Vec<&str> = match ignore.filter(|list| !list.trim().is_empty()) {
        Some(list) => {
            let ignored: Vec<&str> = list.split(',').collect();
            endpoints
                .iter()
                .copied()
                .filter(|endpoint| !ignored.contains(endpoint))
                .collect()
        }
        None => endpoints.to_vec(),
    };

    let endpoint = candidates
        .choose(rng)
        .ok_or(AppError::AllEndpointsIgnored)?;

    Ok(ResolvedRequest::new(category, *endpoint))
}

/// Resolve `/{type}?eps=a,b,c` by picking one of the caller's entries.
pub fn resolve_eps<R: Rng + ?Sized>(
    type_param: &str,
    eps: Option<&str>,
    rng: &mut R,
) -> AppResult<ResolvedRequest> {
    let eps = eps.ok_or(AppError::MissingEps)?;
    let type_param = type_param.to_lowercase();

    let entries: Vec<&str> = eps.split(',').collect();
    let picked = entries.choose(rng).ok_or(AppError::BadEndpoint)?;

    if !is_valid_endpoint(&type_param, picked) {
        return Err(AppError::BadEndpoint);
    }

    let category = Category::parse(&type_param).ok_or(AppError::BadEndpoint)?;
    Ok(ResolvedRequest::new(category, *picked))
}
