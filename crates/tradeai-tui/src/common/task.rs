use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub u64);

#[derive(Debug, Default)]
pub struct TaskSeq {
    next: u64,
}

impl TaskSeq {
    pub fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Login,
    Register,
    Logout,
    SessionCheck,
    Conversations,
    ConversationCreate,
    History,
    Send,
    OlderPage,
    News,
}

/// Task lifecycle state (stored in AppState, mutated only by the reducer).
#[derive(Debug, Default, Clone)]
pub struct TaskState {
    pub active: Option<TaskId>,
    pub cancel: Option<CancellationToken>,
}

impl TaskState {
    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start(&mut self, id: TaskId) {
        self.active = Some(id);
        self.cancel = None;
    }

    /// Clears the task if `id` is the active one. Returns false for stale
    /// completions (a newer task of the same kind superseded this one).
    pub fn finish_if_active(&mut self, id: TaskId) -> bool {
        let ok = self.active == Some(id);
        if ok {
            self.active = None;
            self.cancel = None;
        }
        ok
    }

    pub fn clear(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.active = None;
    }
}

#[derive(Debug, Default, Clone)]
pub struct Tasks {
    pub login: TaskState,
    pub register: TaskState,
    pub logout: TaskState,
    pub session_check: TaskState,
    pub conversations: TaskState,
    pub conversation_create: TaskState,
    pub history: TaskState,
    pub send: TaskState,
    pub older_page: TaskState,
    pub news: TaskState,
}

impl Tasks {
    pub fn state_mut(&mut self, kind: TaskKind) -> &mut TaskState {
        match kind {
            TaskKind::Login => &mut self.login,
            TaskKind::Register => &mut self.register,
            TaskKind::Logout => &mut self.logout,
            TaskKind::SessionCheck => &mut self.session_check,
            TaskKind::Conversations => &mut self.conversations,
            TaskKind::ConversationCreate => &mut self.conversation_create,
            TaskKind::History => &mut self.history,
            TaskKind::Send => &mut self.send,
            TaskKind::OlderPage => &mut self.older_page,
            TaskKind::News => &mut self.news,
        }
    }

    /// Clears every task (conversation switch / logout).
    pub fn clear_all(&mut self) {
        self.login.clear();
        self.register.clear();
        self.logout.clear();
        self.session_check.clear();
        self.conversations.clear();
        self.conversation_create.clear();
        self.history.clear();
        self.send.clear();
        self.older_page.clear();
        self.news.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_if_active_rejects_stale_ids() {
        let mut seq = TaskSeq::default();
        let mut state = TaskState::default();
        let old = seq.next_id();
        let new = seq.next_id();
        state.start(old);
        state.start(new);
        assert!(!state.finish_if_active(old));
        assert!(state.is_running());
        assert!(state.finish_if_active(new));
        assert!(!state.is_running());
    }
}
