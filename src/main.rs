#[macro_use]
extern crate rocket;

use rocket::{Build, Rocket};

use crate::repository::initialize_db;
use crate::tagged_content::handler::{
    create_tagged_content, delete_tagged_content, get_categorized_tagged_content,
    get_expression_tagged_content, get_land_tagged_content, get_tagged_content,
    update_tagged_content,
};
use crate::tags::handler::{get_tag_tree, save_tag_tree};

mod config;
mod logger;
mod model;
mod repository;
mod tagged_content;
mod tags;
#[cfg(test)]
mod test;

#[launch]
fn rocket() -> Rocket<Build> {
    #[cfg(not(test))]
    {
        let config = &*config::TAG_EXPLORER_CONFIG;
        if let Err(e) = logger::init_logger(&config.log) {
            // rocket's logger still works, so keep going
            log::warn!("Failed to set up logging: {e}");
        }
        log::info!("Using database at {}", config.database.location);
    }
    if let Err(e) = initialize_db() {
        // nothing works without the schema
        panic!("Failed to initialize the database! Error is {e:?}");
    }
    rocket::build()
        .mount("/tags", routes![get_tag_tree, save_tag_tree])
        .mount(
            "/tagged-content",
            routes![
                get_tagged_content,
                get_expression_tagged_content,
                get_land_tagged_content,
                get_categorized_tagged_content,
                create_tagged_content,
                update_tagged_content,
                delete_tagged_content
            ],
        )
}
