mod helpers;
mod lookup_test;
mod review_test;
mod title_test;
mod user_test;
