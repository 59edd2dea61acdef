use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fittrack::config::Config;
use fittrack::handlers::{auth, dashboard, home, settings, users, workouts};
use fittrack::middleware::AuthContext;
use fittrack::repositories::{
    ExerciseTypeRepository, SessionRepository, UserRepository, WorkoutRepository,
};
use fittrack::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fittrack=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);

    let pool = db::create_pool(&config.database_url)?;

    migrations::run_migrations(&pool)?;

    let user_repo = UserRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());
    let workout_repo = WorkoutRepository::new(pool.clone());
    let exercise_type_repo = ExerciseTypeRepository::new(pool.clone());

    let auth_state = auth::AuthState {
        user_repo: user_repo.clone(),
        session_repo: session_repo.clone(),
    };
    let home_state = home::HomeState {
        workout_repo: workout_repo.clone(),
    };
    let workouts_state = workouts::WorkoutsState {
        workout_repo: workout_repo.clone(),
        exercise_type_repo: exercise_type_repo.clone(),
    };
    let dashboard_state = dashboard::DashboardState {
        workout_repo: workout_repo.clone(),
    };
    let users_state = users::UsersState {
        user_repo: user_repo.clone(),
        workout_repo: workout_repo.clone(),
    };
    let settings_state = settings::SettingsState {
        user_repo: user_repo.clone(),
    };

    let auth_context = AuthContext {
        user_repo,
        session_repo,
    };

    let app = routes::create_router(
        auth_state,
        home_state,
        workouts_state,
        dashboard_state,
        users_state,
        settings_state,
        auth_context,
    );

    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
