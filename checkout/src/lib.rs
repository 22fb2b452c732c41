use actix_web::web::{self};

pub mod routes {
    pub mod checkout;
}

pub mod services {
    pub mod checkout;
}

pub mod dtos {
    pub mod checkout;
}

pub mod models {
    pub mod cart;
}

pub mod misc {
    pub mod mask;
    pub mod messages;
    pub mod qr;
}

pub fn mount_checkout() -> actix_web::Scope {
    web::scope("/checkout")
        .service(routes::checkout::get_summary)
        .service(routes::checkout::post_pix)
        .service(routes::checkout::post_card)
}
