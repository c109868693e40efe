use std::cell::RefCell;

#[derive(Clone)]
struct Env {
    cc: String,
    assembler: String,
}

thread_local! {
    /// Must only be mutated within `set_env`
    static ENV: RefCell<Option<Env>> = const { RefCell::new(None) };
}

pub fn init() {
    let value = Env {
        cc: var_or("CCPU_CC", "gcc"),
        assembler: var_or("CCPU_AS", "as"),
    };
    set_env(value);
}

/// External C compiler command.
pub fn cc() -> String {
    with_env(|env| env.cc.clone())
}

/// External assembler command.
pub fn assembler() -> String {
    with_env(|env| env.assembler.clone())
}

fn set_env(value: Env) {
    ENV.with(|env| {
        let mut env = env.borrow_mut();
        assert!(
            env.is_none(),
            "tried to initialize environment state multiple times"
        );
        *env = Some(value);
    });
}

fn with_env<F, R>(callback: F) -> R
where
    F: Fn(&Env) -> R,
{
    ENV.with(|env| {
        let env = env.borrow();
        let env = env.as_ref().unwrap_or_else(|| {
            panic!("tried to access environment state before initialization");
        });
        callback(env)
    })
}

fn var_or(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}
