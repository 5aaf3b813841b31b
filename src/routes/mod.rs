use actix_web::web::{scope, ServiceConfig};
use actix_web::Scope;

use admin::run_notification_sweep_now;
use dashboard::get_dashboard_stats;
use interactions::{
    get_applied_scholarships, get_interaction_status, get_saved_scholarships, track_scholarship,
};
use profiles::{get_my_profile, submit_profile};
use scholarships::{create_scholarship, get_matching_scholarships, list_scholarships};
use users::{get_account, login, register};

mod admin;
mod dashboard;
mod health_check;
mod interactions;
mod profiles;
mod scholarships;
mod users;

use crate::routes::health_check::*;

fn util_routes() -> Scope {
    scope("").service(health_check)
}

fn users_routes() -> Scope {
    scope("users")
        .service(register)
        .service(login)
        .service(get_account)
}

fn profiles_routes() -> Scope {
    scope("profiles")
        .service(submit_profile)
        .service(get_my_profile)
}

fn scholarships_routes() -> Scope {
    scope("scholarships")
        .service(list_scholarships)
        .service(create_scholarship)
        .service(get_matching_scholarships)
        // interaction routes
        .service(get_saved_scholarships)
        .service(get_applied_scholarships)
        .service(get_interaction_status)
        .service(track_scholarship)
}

fn dashboard_routes() -> Scope {
    scope("dashboard").service(get_dashboard_stats)
}

fn admin_routes() -> Scope {
    scope("admin").service(run_notification_sweep_now)
}

pub fn scholar_match_routes(conf: &mut ServiceConfig) {
    conf.service(
        scope("api/v1")
            .service(users_routes())
            .service(profiles_routes())
            .service(scholarships_routes())
            .service(dashboard_routes())
            .service(admin_routes())
            .service(util_routes()),
    );
}
