use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::health::health))
        .nest("/chatdb", record_routes())
}

fn record_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(handlers::record::get_record))
        .routes(routes!(
            handlers::record::list_records,
            handlers::record::create_record
        ));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::record::create_record_with_image))
        .layer(handlers::record::image_upload_body_limit());

    crud.merge(upload)
}
