/// Chemical batch number registry routes.
pub(crate) mod chemicals;

/// Contract management routes.
pub(crate) mod contracts;

/// Quotation management routes.
pub(crate) mod quotations;

/// User management and authentication routes.
pub(crate) mod users;
