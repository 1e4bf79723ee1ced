mod booking_test;
mod middleware_test;
mod routes_test;
mod settings_test;
