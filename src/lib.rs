// Livestock feed prediction service: model loading and the HTTP layer around it

pub mod web;
