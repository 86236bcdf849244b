mod dispatcher;
mod session;
