mod repo_test;
mod user_test;
