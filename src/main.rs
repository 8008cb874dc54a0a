#[cfg(feature = "ssr")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    use anyhow::Context;
    use axum::Router;
    use axum_tracing_opentelemetry::middleware::{OtelAxumLayer, OtelInResponseLayer};
    use file_contributors::app::*;
    use file_contributors::config::Config;
    use file_contributors::github::{GitHubCommits, SharedSource};
    use leptos::prelude::*;
    use leptos_axum::{generate_route_list, LeptosRoutes};
    use opentelemetry_configuration::OtelSdkBuilder;
    use tower::ServiceBuilder;
    use tower_http::compression::CompressionLayer;

    let config = Config::load().context("failed to load configuration")?;

    let _guard = OtelSdkBuilder::new()
        .service_name(env!("CARGO_PKG_NAME"))
        .service_version(env!("CARGO_PKG_VERSION"))
        .resource_attribute("vcs.repository.name", env!("CARGO_PKG_NAME"))
        .resource_attribute("vcs.ref.head.revision", env!("VCS_REF_HEAD_REVISION"))
        .resource_attribute("vcs.ref.head.name", env!("VCS_REF_HEAD_NAME"))
        .resource_attribute("vcs.ref.head.type", "branch")
        .endpoint(config.otel.endpoint.as_deref().unwrap_or("http://127.0.0.1:4318"))
        .with_standard_env()
        .build()
        .context("failed to initialise OpenTelemetry")?;

    let conf = get_configuration(None)?;
    let leptos_options = conf.leptos_options;
    let routes = generate_route_list(App);

    let settings = SiteSettings {
        locale: config.locale.clone(),
        matomo: config.matomo.clone(),
    };

    let source = config.github.as_ref().map(|github| {
        tracing::info!(owner = %github.owner, repo = %github.repo, "reading contributors from GitHub");
        SharedSource(Arc::new(GitHubCommits::from_config(github)))
    });
    if source.is_none() {
        tracing::warn!("no GitHub repository configured, pages will list no contributors");
    }

    let app = Router::new()
        .leptos_routes_with_context(
            &leptos_options,
            routes,
            move || {
                provide_context(settings.clone());
                if let Some(source) = source.clone() {
                    provide_context(source);
                }
            },
            {
                let leptos_options = leptos_options.clone();
                move || shell(leptos_options.clone())
            },
        )
        .fallback(leptos_axum::file_and_error_handler(shell))
        .layer(
            ServiceBuilder::new()
                .layer(OtelAxumLayer::default())
                .layer(OtelInResponseLayer)
                .layer(CompressionLayer::new()),
        )
        .with_state(leptos_options);

    if let Some(socket_path) = config.socket {
        tracing::info!("listening on unix socket {}", &socket_path);
        let listener = tokio::net::UnixListener::bind(&socket_path)?;
        axum::serve(listener, app.into_make_service()).await?;
    } else {
        let addr: SocketAddr = config.listen.parse().context("invalid listen address")?;
        tracing::info!("listening on http://{}", &addr);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        axum::serve(listener, app.into_make_service()).await?;
    }

    Ok(())
}

#[cfg(not(feature = "ssr"))]
pub fn main() {
    // no client-side main function
    // see lib.rs for hydration function instead
}
