mod fallback;
mod subscribe;
mod unsubscribe;
