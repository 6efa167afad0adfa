//! Server-rendered pages. Templates live in `templates/` and are compiled into
//! the binary; handlebars escapes every interpolated value.

use handlebars::{Handlebars, RenderError, TemplateError};
use serde::Serialize;

use crate::{
    flash::Flash,
    model::{CurrentUser, Todo},
};

#[derive(Serialize)]
struct TodoRow<'a> {
    id: i64,
    sno: usize,
    title: &'a str,
    desc: &'a str,
    created: String,
}

impl<'a> TodoRow<'a> {
    fn new(sno: usize, todo: &'a Todo) -> Self {
        TodoRow {
            id: todo.id,
            sno,
            title: &todo.title,
            desc: &todo.desc,
            created: todo.date_created.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Serialize)]
struct Page<'a, T: Serialize> {
    title: &'static str,
    username: Option<&'a str>,
    flashes: &'a [Flash],
    #[serde(flatten)]
    content: T,
}

#[derive(Serialize)]
struct IndexContent<'a> {
    todos: Vec<TodoRow<'a>>,
}

#[derive(Serialize)]
struct UpdateContent<'a> {
    todo: TodoRow<'a>,
}

#[derive(Serialize)]
struct NoContent {}

pub struct Templates {
    registry: Handlebars<'static>,
}

impl Templates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        registry.register_partial("header", include_str!("../templates/header.hbs"))?;
        registry.register_partial("footer", include_str!("../templates/footer.hbs"))?;
        registry.register_template_string("index", include_str!("../templates/index.hbs"))?;
        registry.register_template_string("update", include_str!("../templates/update.hbs"))?;
        registry.register_template_string("login", include_str!("../templates/login.hbs"))?;
        registry.register_template_string("register", include_str!("../templates/register.hbs"))?;
        Ok(Templates { registry })
    }

    pub fn index(
        &self,
        user: &CurrentUser,
        todos: &[Todo],
        flashes: &[Flash],
    ) -> Result<String, RenderError> {
        let todos = todos
            .iter()
            .enumerate()
            .map(|(index, todo)| TodoRow::new(index + 1, todo))
            .collect();
        self.registry.render(
            "index",
            &Page {
                title: "My Todos",
                username: Some(&user.username),
                flashes,
                content: IndexContent { todos },
            },
        )
    }

    pub fn update(
        &self,
        user: &CurrentUser,
        todo: &Todo,
        flashes: &[Flash],
    ) -> Result<String, RenderError> {
        self.registry.render(
            "update",
            &Page {
                title: "Update Todo",
                username: Some(&user.username),
                flashes,
                content: UpdateContent {
                    todo: TodoRow::new(0, todo),
                },
            },
        )
    }

    pub fn login(&self, flashes: &[Flash]) -> Result<String, RenderError> {
        self.guest_page("login", "Login", flashes)
    }

    pub fn register(&self, flashes: &[Flash]) -> Result<String, RenderError> {
        self.guest_page("register", "Register", flashes)
    }

    fn guest_page(
        &self,
        name: &str,
        title: &'static str,
        flashes: &[Flash],
    ) -> Result<String, RenderError> {
        self.registry.render(
            name,
            &Page {
                title,
                username: None,
                flashes,
                content: NoContent {},
            },
        )
    }
}
